// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded, batched enrichment fetching

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chains::types::ChainRecord;

use super::config::EnrichmentConfig;
use super::source::EnrichmentSource;
use super::types::ChainEnrichment;

pub struct EnrichmentFetcher {
    source: Arc<dyn EnrichmentSource>,
    config: EnrichmentConfig,
}

impl EnrichmentFetcher {
    pub fn new(source: Arc<dyn EnrichmentSource>, config: EnrichmentConfig) -> Self {
        Self { source, config }
    }

    /// Chains worth enriching: verified ones first, then low ids, capped
    pub fn eligible_chain_ids<'a, I>(&self, chains: I) -> Vec<u64>
    where
        I: IntoIterator<Item = &'a ChainRecord>,
    {
        let (verified, others): (Vec<&ChainRecord>, Vec<&ChainRecord>) = chains
            .into_iter()
            .filter(|c| c.verified || c.chain_id < self.config.chain_id_ceiling)
            .partition(|c| c.verified);

        verified
            .into_iter()
            .chain(others)
            .map(|c| c.chain_id)
            .take(self.config.max_chains)
            .collect()
    }

    /// Fetch enrichment for the given chains
    ///
    /// Chains are fetched `batch_size` at a time; a failure for one chain is
    /// logged and that chain is left out of the result.
    pub async fn fetch_enrichment(&self, chain_ids: &[u64]) -> HashMap<u64, ChainEnrichment> {
        let mut enrichment = HashMap::new();
        let batch_size = self.config.batch_size.max(1);
        let mut failures = 0usize;

        for (batch_idx, batch) in chain_ids.chunks(batch_size).enumerate() {
            if batch_idx > 0 && self.config.batch_delay_ms > 0 {
                tokio::time::sleep(self.config.batch_delay()).await;
            }

            let lookups = batch.iter().map(|&id| async move {
                (id, self.source.fetch_chain(id).await)
            });

            for (chain_id, result) in join_all(lookups).await {
                match result {
                    Ok(Some(data)) => {
                        enrichment.insert(chain_id, data);
                    }
                    Ok(None) => debug!("No enrichment available for chain {}", chain_id),
                    Err(e) => {
                        warn!(
                            "Enrichment from {} failed for chain {}: {}",
                            self.source.name(),
                            chain_id,
                            e
                        );
                        failures += 1;
                    }
                }
            }
        }

        if !chain_ids.is_empty() {
            info!(
                "Enrichment: {} of {} chains enriched ({} failed)",
                enrichment.len(),
                chain_ids.len(),
                failures
            );
        }

        enrichment
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::types::NativeCurrency;
    use crate::enrichment::types::EnrichmentError;
    use crate::fetcher::types::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockEnrichment {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockEnrichment {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EnrichmentSource for MockEnrichment {
        async fn fetch_chain(&self, chain_id: u64) -> Result<Option<ChainEnrichment>, EnrichmentError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match chain_id {
                404 => Ok(None),
                500 => Err(FetchError::HttpStatus {
                    source_name: "mock".to_string(),
                    status: 500,
                }
                .into()),
                _ => Ok(Some(ChainEnrichment {
                    chain_id,
                    features: vec!["EIP1559".to_string()],
                    bridges: Vec::new(),
                    parent: None,
                })),
            }
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn config() -> EnrichmentConfig {
        EnrichmentConfig {
            max_chains: 3,
            chain_id_ceiling: 1000,
            batch_size: 2,
            batch_delay_ms: 0,
            ..EnrichmentConfig::default()
        }
    }

    fn chain(id: u64, verified: bool) -> ChainRecord {
        let mut record = ChainRecord::new(
            id,
            format!("Chain {}", id),
            NativeCurrency {
                name: "Coin".to_string(),
                symbol: "C".to_string(),
                decimals: 18,
            },
        );
        record.verified = verified;
        record
    }

    #[test]
    fn test_eligible_prefers_verified_and_respects_caps() {
        let fetcher = EnrichmentFetcher::new(Arc::new(MockEnrichment::new()), config());
        let chains = vec![
            chain(1, false),
            chain(5000, false),
            chain(8453, true),
            chain(10, false),
            chain(137, false),
        ];

        let ids = fetcher.eligible_chain_ids(&chains);
        assert_eq!(ids, vec![8453, 1, 10]);
    }

    #[tokio::test]
    async fn test_fetch_skips_missing_and_failed() {
        let fetcher = EnrichmentFetcher::new(Arc::new(MockEnrichment::new()), config());
        let result = fetcher.fetch_enrichment(&[1, 404, 500, 10]).await;

        assert_eq!(result.len(), 2);
        assert!(result.contains_key(&1));
        assert!(result.contains_key(&10));
    }

    #[tokio::test]
    async fn test_batches_bound_concurrency() {
        let source = Arc::new(MockEnrichment::new());
        let fetcher = EnrichmentFetcher::new(source.clone(), config());
        fetcher.fetch_enrichment(&[1, 2, 3, 4, 5, 6, 7]).await;

        assert!(source.max_in_flight.load(Ordering::SeqCst) <= 2);
    }
}
