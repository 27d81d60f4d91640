// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registry fetch orchestration
//!
//! Consults sources in priority order, validates and merges their records,
//! caches live snapshots and falls back to the bundled dataset when nothing
//! usable comes back.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::chains::fallback::{bundled_dataset, minimal_chain, FALLBACK_SOURCE};
use crate::chains::types::ChainRecord;

use super::accumulator::ChainAccumulator;
use super::cache::SnapshotCache;
use super::chainid_network::ChainidNetworkSource;
use super::chainlist::ChainlistSource;
use super::config::FetcherConfig;
use super::curated::CuratedRegistrySource;
use super::http::HttpJsonClient;
use super::source::ChainSource;
use super::types::{FetchError, RegistrySnapshot, SnapshotOrigin};
use super::validate::validate_record;

/// Pulls chain records from every configured registry source
pub struct ChainRegistryFetcher {
    sources: Vec<Box<dyn ChainSource>>,
    cache: SnapshotCache,
    config: FetcherConfig,
}

impl ChainRegistryFetcher {
    /// Create a fetcher with the built-in HTTP sources
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = HttpJsonClient::new(
            config.request_timeout(),
            config.max_retries,
            config.retry_base_delay(),
        )?;

        let mut sources: Vec<Box<dyn ChainSource>> = Vec::new();

        if config.curated_registry_url.is_some() {
            sources.push(Box::new(CuratedRegistrySource::new(
                config.curated_registry_url.clone(),
                client.clone(),
            )));
            debug!("Curated registry source enabled");
        }

        sources.push(Box::new(ChainlistSource::new(
            config.chainlist_url.clone(),
            client.clone(),
        )));
        sources.push(Box::new(ChainidNetworkSource::new(
            config.chainid_network_url.clone(),
            client,
        )));

        Ok(Self::with_sources(config, sources))
    }

    /// Create a fetcher over an explicit set of sources
    pub fn with_sources(config: FetcherConfig, mut sources: Vec<Box<dyn ChainSource>>) -> Self {
        // Lower = consulted first; stable so equal priorities keep insertion order
        sources.sort_by_key(|s| s.priority());
        let cache = SnapshotCache::new(std::time::Duration::from_secs(config.cache_ttl_secs));

        Self {
            sources,
            cache,
            config,
        }
    }

    /// Fetch, validate and deduplicate every source's chains
    ///
    /// Never fails and never returns an empty snapshot: if no source yields a
    /// valid record the bundled dataset is returned (and not cached).
    pub async fn fetch_all(&self) -> Arc<RegistrySnapshot> {
        if let Some(snapshot) = self.cache.get() {
            debug!("Registry cache hit ({} chains)", snapshot.len());
            return snapshot;
        }

        let start = Instant::now();
        let mut accumulator = ChainAccumulator::new();
        let mut failed_sources = Vec::new();

        for source in &self.sources {
            if !source.is_available() {
                continue;
            }

            debug!("Trying registry source: {}", source.name());

            let records = match source.fetch().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Registry source {} failed: {}, trying next", source.name(), e);
                    failed_sources.push(source.name().to_string());
                    continue;
                }
            };

            let mut valid = 0usize;
            let mut rejected = 0usize;
            for record in records {
                match validate_record(record) {
                    Ok(record) => {
                        accumulator.add(source.name(), record);
                        valid += 1;
                    }
                    Err(e) => {
                        debug!("{}: dropping record: {}", source.name(), e);
                        rejected += 1;
                    }
                }
            }

            if valid == 0 {
                warn!(
                    "Registry source {} produced no valid records ({} rejected)",
                    source.name(),
                    rejected
                );
                failed_sources.push(source.name().to_string());
                continue;
            }

            info!(
                "Registry source {}: {} valid records ({} rejected)",
                source.name(),
                valid,
                rejected
            );

            if valid > self.config.early_exit_min_records {
                info!(
                    "{} alone returned {} records, skipping lower-priority sources",
                    source.name(),
                    valid
                );
                break;
            }
        }

        if accumulator.is_empty() {
            let snapshot = Arc::new(fallback_snapshot(failed_sources));
            error!(
                "All registry sources failed, serving {} bundled chains",
                snapshot.len()
            );
            return snapshot;
        }

        let snapshot = Arc::new(RegistrySnapshot {
            records: accumulator.into_records(),
            origin: SnapshotOrigin::Live,
            fetched_at: Utc::now(),
            failed_sources,
        });
        self.cache.insert(Arc::clone(&snapshot));

        info!(
            "Registry fetch complete: {} chains in {}ms",
            snapshot.len(),
            start.elapsed().as_millis()
        );

        snapshot
    }

    /// Convenience wrapper returning owned records
    pub async fn fetch_chains(&self) -> Vec<ChainRecord> {
        self.fetch_all().await.chains().cloned().collect()
    }

    /// Drop the cached snapshot so the next call hits the sources
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Last live snapshot, even if it has expired
    pub fn cached_snapshot(&self) -> Option<Arc<RegistrySnapshot>> {
        self.cache.get_any()
    }

    /// Names of the available sources in the order they are consulted
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.name())
            .collect()
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

/// Snapshot built from the bundled dataset
pub fn fallback_snapshot(failed_sources: Vec<String>) -> RegistrySnapshot {
    let dataset = bundled_dataset();
    let mut accumulator = ChainAccumulator::new();

    for chain in &dataset.chains {
        match validate_record(chain.clone()) {
            Ok(record) => accumulator.add(FALLBACK_SOURCE, record),
            Err(e) => warn!("Bundled chain rejected: {}", e),
        }
    }
    if accumulator.is_empty() {
        accumulator.add(FALLBACK_SOURCE, minimal_chain());
    }

    RegistrySnapshot {
        records: accumulator.into_records(),
        origin: SnapshotOrigin::Fallback {
            version: dataset.version.clone(),
        },
        fetched_at: Utc::now(),
        failed_sources,
    }
}
