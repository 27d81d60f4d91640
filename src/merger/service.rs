// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical registry ownership and publishing
//!
//! The merger owns the published snapshot. Every pass builds a complete new
//! `Vec` and swaps the `Arc`, so readers always see one consistent list.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::chains::types::MergedChainRecord;
use crate::enrichment::service::EnrichmentFetcher;
use crate::enrichment::types::ChainEnrichment;
use crate::fetcher::types::RegistrySnapshot;
use crate::health::monitor::HealthMonitor;
use crate::health::types::EndpointHealth;

use super::config::RefreshConfig;
use super::loader::RegistryLoader;
use super::merge::{merge_all, minimal_fallback_records, sort_records, with_health};

type Snapshot = Arc<Vec<MergedChainRecord>>;

pub struct ChainDataMerger {
    loader: Arc<dyn RegistryLoader>,
    enrichment_fetcher: Option<EnrichmentFetcher>,
    monitor: Arc<HealthMonitor>,
    config: RefreshConfig,
    registry: RwLock<Option<Arc<RegistrySnapshot>>>,
    enrichment: RwLock<HashMap<u64, ChainEnrichment>>,
    snapshot: RwLock<Snapshot>,
}

impl ChainDataMerger {
    pub fn new(
        loader: Arc<dyn RegistryLoader>,
        enrichment_fetcher: Option<EnrichmentFetcher>,
        monitor: Arc<HealthMonitor>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            loader,
            enrichment_fetcher,
            monitor,
            config,
            registry: RwLock::new(None),
            enrichment: RwLock::new(HashMap::new()),
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Currently published records, sorted
    pub fn snapshot(&self) -> Snapshot {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Published record for one chain
    pub fn get(&self, chain_id: u64) -> Option<MergedChainRecord> {
        self.snapshot()
            .iter()
            .find(|r| r.chain_id() == chain_id)
            .cloned()
    }

    fn publish(&self, records: Vec<MergedChainRecord>) -> Snapshot {
        let records = Arc::new(records);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = Arc::clone(&records),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&records),
        }
        records
    }

    fn registry(&self) -> Option<Arc<RegistrySnapshot>> {
        self.registry.read().ok().and_then(|r| r.clone())
    }

    fn remerge(&self, registry: &RegistrySnapshot) -> Snapshot {
        let enrichment = self
            .enrichment
            .read()
            .map(|e| e.clone())
            .unwrap_or_default();
        let records = merge_all(registry, &enrichment, |chain| self.monitor.known_health(chain));
        self.publish(records)
    }

    /// Publish a record for every chain without probing anything
    ///
    /// Endpoints are `unknown` unless the prober already holds a result.
    pub async fn fast_pass(&self) -> Snapshot {
        let start = Instant::now();

        let registry = match self.loader.load().await {
            Ok(registry) if !registry.is_empty() => registry,
            Ok(_) => {
                error!("Registry load returned no chains, publishing minimal fallback");
                return self.publish(minimal_fallback_records());
            }
            Err(e) => {
                error!("Registry load failed ({}), publishing minimal fallback", e);
                return self.publish(minimal_fallback_records());
            }
        };

        if let Ok(mut slot) = self.registry.write() {
            *slot = Some(Arc::clone(&registry));
        }

        let published = self.remerge(&registry);
        info!(
            "Fast pass published {} chains in {}ms",
            published.len(),
            start.elapsed().as_millis()
        );
        published
    }

    /// Fetch enrichment for the eligible subset and republish
    ///
    /// Returns the number of chains enriched.
    pub async fn enrich(&self) -> usize {
        let Some(fetcher) = self.enrichment_fetcher.as_ref() else {
            return 0;
        };
        let Some(registry) = self.registry() else {
            debug!("No registry loaded yet, skipping enrichment");
            return 0;
        };

        let chain_ids = fetcher.eligible_chain_ids(registry.chains());
        let data = fetcher.fetch_enrichment(&chain_ids).await;
        let enriched = data.len();

        if let Ok(mut slot) = self.enrichment.write() {
            slot.extend(data);
        }
        self.remerge(&registry);

        enriched
    }

    /// Chain ids re-probed on each refresh: popular ids, then verified chains
    pub fn refresh_subset(&self) -> Vec<u64> {
        let snapshot = self.snapshot();
        let present: HashSet<u64> = snapshot.iter().map(|r| r.chain_id()).collect();
        let mut seen = HashSet::new();

        self.config
            .popular_chain_ids
            .iter()
            .copied()
            .filter(|id| present.contains(id))
            .chain(
                snapshot
                    .iter()
                    .filter(|r| r.chain.verified)
                    .map(|r| r.chain_id()),
            )
            .filter(|id| seen.insert(*id))
            .take(self.config.max_chains)
            .collect()
    }

    /// Re-probe the refresh subset and republish just those chains
    ///
    /// Records are rebuilt from the snapshot current at swap time, so a pass
    /// that republished while probes were in flight keeps its chain data.
    /// Returns the number of chains updated.
    pub async fn refresh_health(&self) -> usize {
        let start = Instant::now();
        let subset = self.refresh_subset();
        if subset.is_empty() {
            return 0;
        }

        let current = self.snapshot();
        let mut probed: HashMap<u64, HashMap<String, EndpointHealth>> = HashMap::new();

        // One chain at a time so the monitor's batch bound holds globally
        for chain_id in &subset {
            let Some(record) = current.iter().find(|r| r.chain_id() == *chain_id) else {
                continue;
            };
            let report = self.monitor.check_chain(&record.chain).await;
            probed.insert(
                *chain_id,
                report
                    .endpoints
                    .into_iter()
                    .map(|health| (health.url.clone(), health))
                    .collect(),
            );
        }

        let now = Utc::now();
        let mut count = 0;
        match self.snapshot.write() {
            Ok(mut guard) => {
                let mut records: Vec<MergedChainRecord> = guard
                    .iter()
                    .map(|r| match probed.get(&r.chain_id()) {
                        Some(results) => {
                            count += 1;
                            // URLs added since the probe fall back to known health
                            let endpoints = self
                                .monitor
                                .known_health(&r.chain)
                                .into_iter()
                                .map(|known| results.get(&known.url).cloned().unwrap_or(known))
                                .collect();
                            with_health(r.chain.clone(), r.sources.clone(), endpoints, now)
                        }
                        None => r.clone(),
                    })
                    .collect();
                sort_records(&mut records);
                *guard = Arc::new(records);
            }
            Err(_) => {
                warn!("Registry snapshot lock poisoned, health refresh discarded");
                return 0;
            }
        }

        info!(
            "Health refresh updated {} chains in {}ms",
            count,
            start.elapsed().as_millis()
        );
        count
    }

    /// Fast pass, then enrichment, then health refresh
    pub async fn run(&self) -> Snapshot {
        self.fast_pass().await;
        self.enrich().await;
        self.refresh_health().await;
        self.snapshot()
    }

    /// Periodically refresh health on a background task
    pub fn spawn_background_refresh(self: &Arc<Self>, interval: Duration) -> RefreshHandle {
        let merger = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick fires immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        merger.monitor.prober().prune();
                        let updated = merger.refresh_health().await;
                        debug!("Background refresh touched {} chains", updated);
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Background refresh stopped");
                        break;
                    }
                }
            }
        });

        RefreshHandle {
            shutdown_tx,
            handle,
        }
    }

    pub fn monitor(&self) -> &Arc<HealthMonitor> {
        &self.monitor
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }
}

/// Handle to a running background refresh task
pub struct RefreshHandle {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the task and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
