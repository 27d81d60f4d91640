// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end merger tests: fast pass, health refresh and selection

use async_trait::async_trait;
use chrono::Utc;
use fabstir_chain_registry::chains::{ChainRecord, NativeCurrency};
use fabstir_chain_registry::fetcher::{RegistrySnapshot, SnapshotOrigin, SourcedRecord};
use fabstir_chain_registry::health::{
    EndpointStatus, HealthConfig, HealthMonitor, ProbeError, RpcProber, RpcTransport,
};
use fabstir_chain_registry::merger::{
    ChainDataMerger, RefreshConfig, RegistryError, RegistryLoader,
};
use fabstir_chain_registry::selector::select_wallet_safe_endpoints;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct StaticLoader {
    result: Result<Arc<RegistrySnapshot>, RegistryError>,
}

#[async_trait]
impl RegistryLoader for StaticLoader {
    async fn load(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        self.result.clone()
    }
}

/// Every URL on `offline_host` fails, everything else answers 200
struct ScriptedTransport {
    offline_host: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, _body: &serde_json::Value) -> Result<u16, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains(self.offline_host) {
            Err(ProbeError::Network("connection refused".to_string()))
        } else {
            Ok(200)
        }
    }
}

fn chain(chain_id: u64, name: &str, rpcs: &[&str]) -> ChainRecord {
    ChainRecord::new(
        chain_id,
        name,
        NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        },
    )
    .with_rpc_urls(rpcs.iter().copied())
}

fn snapshot(chains: Vec<ChainRecord>) -> Arc<RegistrySnapshot> {
    Arc::new(RegistrySnapshot {
        records: chains
            .into_iter()
            .map(|record| SourcedRecord {
                record,
                sources: vec!["test".to_string()],
            })
            .collect(),
        origin: SnapshotOrigin::Live,
        fetched_at: Utc::now(),
        failed_sources: Vec::new(),
    })
}

fn merger(
    loader: StaticLoader,
    transport: Arc<ScriptedTransport>,
) -> Arc<ChainDataMerger> {
    let config = HealthConfig {
        batch_delay_ms: 0,
        ..Default::default()
    };
    let prober = Arc::new(RpcProber::new(config, transport));
    let monitor = Arc::new(HealthMonitor::new(prober));
    Arc::new(ChainDataMerger::new(
        Arc::new(loader),
        None,
        monitor,
        RefreshConfig::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_pass_publishes_before_probing() {
        let transport = Arc::new(ScriptedTransport {
            offline_host: "none",
            calls: AtomicUsize::new(0),
        });
        let loader = StaticLoader {
            result: Ok(snapshot(vec![
                chain(8453, "Base", &["https://mainnet.base.org"]),
                chain(1, "Ethereum Mainnet", &["https://ethereum.publicnode.com"]),
            ])),
        };
        let merger = merger(loader, transport.clone());

        let published = merger.fast_pass().await;
        assert_eq!(published.len(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        for record in published.iter() {
            assert!(record
                .endpoints
                .iter()
                .all(|e| e.status == EndpointStatus::Unknown));
        }
    }

    #[tokio::test]
    async fn test_health_refresh_drives_selection() {
        let transport = Arc::new(ScriptedTransport {
            offline_host: "mainnet.base.org",
            calls: AtomicUsize::new(0),
        });
        let loader = StaticLoader {
            result: Ok(snapshot(vec![chain(
                8453,
                "Base",
                &["https://mainnet.base.org", "https://base.publicnode.com"],
            )])),
        };
        let merger = merger(loader, transport.clone());

        merger.fast_pass().await;
        let updated = merger.refresh_health().await;
        assert_eq!(updated, 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);

        let base = merger.get(8453).unwrap();
        assert_eq!(
            base.endpoint_health("https://mainnet.base.org").unwrap().status,
            EndpointStatus::Offline
        );
        assert!(base.health.is_some());

        // The official endpoint is down, so the reliable provider wins
        assert_eq!(
            select_wallet_safe_endpoints(&base),
            vec!["https://base.publicnode.com"]
        );
    }

    #[tokio::test]
    async fn test_failed_load_publishes_minimal_fallback() {
        let transport = Arc::new(ScriptedTransport {
            offline_host: "none",
            calls: AtomicUsize::new(0),
        });
        let loader = StaticLoader {
            result: Err(RegistryError::AllSourcesFailed),
        };
        let merger = merger(loader, transport);

        let published = merger.fast_pass().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].chain_id(), 1);
    }

    #[tokio::test]
    async fn test_background_refresh_shuts_down() {
        let transport = Arc::new(ScriptedTransport {
            offline_host: "none",
            calls: AtomicUsize::new(0),
        });
        let loader = StaticLoader {
            result: Ok(snapshot(vec![chain(1, "Ethereum Mainnet", &["https://ethereum.publicnode.com"])])),
        };
        let merger = merger(loader, transport);
        merger.fast_pass().await;

        let handle = merger.spawn_background_refresh(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(70)).await;
        handle.shutdown().await;

        let eth = merger.get(1).unwrap();
        assert!(eth.endpoints.iter().all(|e| e.status.is_probed()));
    }
}
