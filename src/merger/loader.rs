// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream registry loading seam

use async_trait::async_trait;
use std::sync::Arc;

use crate::fetcher::service::ChainRegistryFetcher;
use crate::fetcher::types::RegistrySnapshot;

use super::types::RegistryError;

/// Anything that can hand the merger a deduplicated registry snapshot
#[async_trait]
pub trait RegistryLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<RegistrySnapshot>, RegistryError>;
}

#[async_trait]
impl RegistryLoader for ChainRegistryFetcher {
    async fn load(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        let snapshot = self.fetch_all().await;
        if snapshot.is_empty() {
            return Err(RegistryError::AllSourcesFailed);
        }
        Ok(snapshot)
    }
}
