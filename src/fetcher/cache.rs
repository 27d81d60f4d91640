// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL cache holding the last live registry snapshot

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::types::RegistrySnapshot;

struct CachedSnapshot {
    snapshot: Arc<RegistrySnapshot>,
    inserted_at: Instant,
}

/// Single-slot cache for the fetcher's last successful pass
pub struct SnapshotCache {
    slot: RwLock<Option<CachedSnapshot>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// Cached snapshot if it is still within the TTL
    pub fn get(&self) -> Option<Arc<RegistrySnapshot>> {
        let slot = self.slot.read().ok()?;
        let cached = slot.as_ref()?;

        if cached.inserted_at.elapsed() > self.ttl {
            return None;
        }

        Some(Arc::clone(&cached.snapshot))
    }

    /// Cached snapshot regardless of age
    pub fn get_any(&self) -> Option<Arc<RegistrySnapshot>> {
        let slot = self.slot.read().ok()?;
        slot.as_ref().map(|c| Arc::clone(&c.snapshot))
    }

    pub fn insert(&self, snapshot: Arc<RegistrySnapshot>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(CachedSnapshot {
                snapshot,
                inserted_at: Instant::now(),
            });
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
