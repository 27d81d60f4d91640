// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL-based cache of probe results, keyed by URL

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::types::EndpointHealth;

/// Per-URL probe result cache with probe history
///
/// Expired entries stay readable through [`HealthCache::get_stale`] until they
/// are evicted, so a rate-limited caller can still be served the last result.
pub struct HealthCache {
    cache: RwLock<HashMap<String, CachedHealth>>,
    ttl: Duration,
    max_entries: usize,
}

struct CachedHealth {
    health: EndpointHealth,
    inserted_at: Instant,
    attempts: u32,
    successes: u32,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct HealthCacheStats {
    /// Total entries in cache
    pub total: usize,
    /// Entries past their TTL (not yet evicted)
    pub expired: usize,
    /// Maximum cache capacity
    pub max: usize,
}

impl HealthCache {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Result for a URL if it is still within the TTL
    pub fn get_fresh(&self, url: &str) -> Option<EndpointHealth> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(Self::cache_key(url))?;

        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }

        Some(entry.health.clone())
    }

    /// Last known result for a URL regardless of age
    pub fn get_stale(&self, url: &str) -> Option<EndpointHealth> {
        let cache = self.cache.read().ok()?;
        cache.get(Self::cache_key(url)).map(|e| e.health.clone())
    }

    /// Store a completed probe and return it with its reliability score filled in
    pub fn record(&self, mut health: EndpointHealth) -> EndpointHealth {
        let mut cache = match self.cache.write() {
            Ok(c) => c,
            Err(_) => return health,
        };

        let key = Self::cache_key(&health.url).to_string();
        let (mut attempts, mut successes) = cache
            .get(&key)
            .map(|e| (e.attempts, e.successes))
            .unwrap_or((0, 0));

        attempts = attempts.saturating_add(1);
        if health.status.is_reachable() {
            successes = successes.saturating_add(1);
        }
        health.reliability_score = Some((successes as u64 * 100 / attempts as u64) as u8);

        if !cache.contains_key(&key) && cache.len() >= self.max_entries {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(
            key,
            CachedHealth {
                health: health.clone(),
                inserted_at: Instant::now(),
                attempts,
                successes,
            },
        );

        health
    }

    /// Clear all cache entries
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    pub fn stats(&self) -> HealthCacheStats {
        let cache = match self.cache.read() {
            Ok(c) => c,
            Err(_) => {
                return HealthCacheStats {
                    total: 0,
                    expired: 0,
                    max: self.max_entries,
                }
            }
        };

        HealthCacheStats {
            total: cache.len(),
            expired: cache
                .values()
                .filter(|e| e.inserted_at.elapsed() > self.ttl)
                .count(),
            max: self.max_entries,
        }
    }

    /// Remove expired entries from cache
    pub fn cleanup_expired(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        }
    }

    fn cache_key(url: &str) -> &str {
        url.trim()
    }

    fn evict_oldest(cache: &mut HashMap<String, CachedHealth>) {
        if let Some(oldest_key) = cache
            .iter()
            .min_by_key(|(_, v)| v.inserted_at)
            .map(|(k, _)| k.clone())
        {
            cache.remove(&oldest_key);
        }
    }
}
