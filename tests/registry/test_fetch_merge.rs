// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registry fetch and merge tests
//!
//! Multi-source deduplication, bundled fallback and the completeness rules
//! applied by the merger.

use async_trait::async_trait;
use fabstir_chain_registry::chains::{ChainRecord, NativeCurrency};
use fabstir_chain_registry::fetcher::{
    ChainRegistryFetcher, ChainSource, FetchError, FetcherConfig, SnapshotOrigin,
};
use fabstir_chain_registry::merger::merge_all;
use std::collections::HashMap;

struct StaticSource {
    name: &'static str,
    priority: u8,
    result: Result<Vec<ChainRecord>, FetchError>,
}

#[async_trait]
impl ChainSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError> {
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

fn eth() -> NativeCurrency {
    NativeCurrency {
        name: "Ether".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

fn chain(chain_id: u64, name: &str, rpcs: &[&str]) -> ChainRecord {
    ChainRecord::new(chain_id, name, eth()).with_rpc_urls(rpcs.iter().copied())
}

fn fetcher(sources: Vec<StaticSource>) -> ChainRegistryFetcher {
    ChainRegistryFetcher::with_sources(
        FetcherConfig::default(),
        sources
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn ChainSource>)
            .collect(),
    )
}

fn timeout(source_name: &str) -> FetchError {
    FetchError::Timeout {
        source_name: source_name.to_string(),
        timeout_ms: 15_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_chain_id_is_merged_once() {
        let fetcher = fetcher(vec![
            StaticSource {
                name: "first",
                priority: 1,
                result: Ok(vec![chain(137, "Polygon", &["https://polygon-rpc.com"])]),
            },
            StaticSource {
                name: "second",
                priority: 2,
                result: Ok(vec![chain(
                    137,
                    "Polygon Mainnet",
                    &["https://polygon.llamarpc.com", "https://polygon-rpc.com/"],
                )]),
            },
        ]);

        let snapshot = fetcher.fetch_all().await;
        assert_eq!(snapshot.len(), 1);

        let merged = snapshot.get(137).unwrap();
        // Higher priority source keeps its scalar fields
        assert_eq!(merged.record.name, "Polygon");
        assert_eq!(
            merged.record.rpc_urls,
            vec!["https://polygon-rpc.com", "https://polygon.llamarpc.com"]
        );
        assert_eq!(merged.sources, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_verified_flag_and_rpc_union_across_sources() {
        let mut unverified = chain(10, "OP Mainnet", &["https://mainnet.optimism.io"]);
        unverified.verified = false;
        let mut verified = chain(
            10,
            "OP Mainnet",
            &["https://mainnet.optimism.io", "https://optimism.publicnode.com"],
        );
        verified.verified = true;

        let fetcher = fetcher(vec![
            StaticSource {
                name: "a",
                priority: 1,
                result: Ok(vec![unverified]),
            },
            StaticSource {
                name: "b",
                priority: 2,
                result: Ok(vec![verified]),
            },
        ]);

        let snapshot = fetcher.fetch_all().await;
        let op = snapshot.get(10).unwrap();
        assert!(op.record.verified);
        assert_eq!(op.record.rpc_urls.len(), 2);
        assert!(op
            .record
            .rpc_urls
            .contains(&"https://optimism.publicnode.com".to_string()));
    }

    #[tokio::test]
    async fn test_all_sources_timing_out_serves_bundled_dataset() {
        let fetcher = fetcher(vec![
            StaticSource {
                name: "chainlist",
                priority: 10,
                result: Err(timeout("chainlist")),
            },
            StaticSource {
                name: "chainid.network",
                priority: 20,
                result: Err(timeout("chainid.network")),
            },
        ]);

        let snapshot = fetcher.fetch_all().await;
        assert!(!snapshot.is_empty());
        assert!(snapshot.is_fallback());
        assert!(matches!(snapshot.origin, SnapshotOrigin::Fallback { .. }));
        assert_eq!(snapshot.failed_sources, vec!["chainlist", "chainid.network"]);
        assert!(snapshot.get(1).is_some());

        // Fallback is not cached, so a recovered source is picked up next time
        assert!(fetcher.cached_snapshot().is_none());
    }

    #[tokio::test]
    async fn test_source_with_only_invalid_records_counts_as_failed() {
        let fetcher = fetcher(vec![
            StaticSource {
                name: "broken",
                priority: 1,
                result: Ok(vec![chain(0, "Zero", &["https://rpc.example.org"])]),
            },
            StaticSource {
                name: "healthy",
                priority: 2,
                result: Ok(vec![chain(56, "BNB Smart Chain", &["https://bsc-dataseed.bnbchain.org"])]),
            },
        ]);

        let snapshot = fetcher.fetch_all().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.failed_sources, vec!["broken"]);
        assert!(!snapshot.is_fallback());
    }

    #[tokio::test]
    async fn test_empty_rpc_list_excludes_rpc_weight() {
        let fetcher = fetcher(vec![StaticSource {
            name: "only",
            priority: 1,
            result: Ok(vec![chain(424242, "Quiet Chain", &[])]),
        }]);

        let snapshot = fetcher.fetch_all().await;
        let merged = merge_all(&snapshot, &HashMap::new(), |_| Vec::new());

        assert_eq!(merged.len(), 1);
        let quiet = &merged[0];
        assert!(quiet.endpoints.is_empty());
        assert!(quiet.health.is_none());
        // Name and chain id only
        assert_eq!(quiet.completeness, 20);
    }
}
