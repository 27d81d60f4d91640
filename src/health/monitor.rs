// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batched health checks across a chain's endpoints

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::chains::types::ChainRecord;

use super::privacy::classify_tracking;
use super::prober::RpcProber;
use super::types::{ChainHealthSummary, EndpointHealth};

/// Health of every endpoint of one chain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainHealthReport {
    pub chain_id: u64,
    pub endpoints: Vec<EndpointHealth>,
    pub summary: Option<ChainHealthSummary>,
}

/// Runs prober calls in fixed-size batches
///
/// Members of a batch are probed concurrently; batches run one after another,
/// so at most `batch_size` probes are in flight at any time.
pub struct HealthMonitor {
    prober: Arc<RpcProber>,
    batch_size: usize,
    batch_delay: Duration,
}

impl HealthMonitor {
    pub fn new(prober: Arc<RpcProber>) -> Self {
        let batch_size = prober.config().batch_size.max(1);
        let batch_delay = prober.config().batch_delay();
        Self {
            prober,
            batch_size,
            batch_delay,
        }
    }

    /// Check a single URL
    pub async fn check_health(&self, url: &str) -> EndpointHealth {
        self.prober.check_health(url).await
    }

    /// Probe a list of URLs, returning results in input order
    pub async fn test_multiple_rpcs(&self, urls: &[String]) -> Vec<EndpointHealth> {
        let mut results = Vec::with_capacity(urls.len());
        let start = Instant::now();

        for (batch_idx, batch) in urls.chunks(self.batch_size).enumerate() {
            if batch_idx > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let checks = batch.iter().map(|url| self.prober.check_health(url));
            results.extend(join_all(checks).await);

            debug!(
                "Probe batch {} done ({} of {} URLs)",
                batch_idx + 1,
                results.len(),
                urls.len()
            );
        }

        if !urls.is_empty() {
            info!(
                "Probed {} RPC URLs in {}ms",
                urls.len(),
                start.elapsed().as_millis()
            );
        }

        results
    }

    /// Probe every endpoint of a chain and summarize
    pub async fn check_chain(&self, chain: &ChainRecord) -> ChainHealthReport {
        let endpoints = self.test_multiple_rpcs(&chain.rpc_urls).await;
        let summary = ChainHealthSummary::from_endpoints(&endpoints);

        ChainHealthReport {
            chain_id: chain.chain_id,
            endpoints,
            summary,
        }
    }

    /// Current health of a chain's endpoints without probing
    ///
    /// URLs failing pre-flight validation are `offline`, as a probe would
    /// report them. Other URLs with no completed probe are `unknown`.
    pub fn known_health(&self, chain: &ChainRecord) -> Vec<EndpointHealth> {
        chain
            .rpc_urls
            .iter()
            .map(|url| {
                self.prober
                    .cached_health(url)
                    .or_else(|| self.prober.preflight(url))
                    .unwrap_or_else(|| EndpointHealth::unprobed(url.clone(), classify_tracking(url)))
            })
            .collect()
    }

    pub fn prober(&self) -> &Arc<RpcProber> {
        &self.prober
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::types::NativeCurrency;
    use crate::health::config::HealthConfig;
    use crate::health::transport::RpcTransport;
    use crate::health::types::{EndpointStatus, ProbeError};
    use async_trait::async_trait;

    struct OkTransport;

    #[async_trait]
    impl RpcTransport for OkTransport {
        async fn post_json(&self, url: &str, _body: &serde_json::Value) -> Result<u16, ProbeError> {
            if url.contains("down") {
                Ok(500)
            } else {
                Ok(200)
            }
        }
    }

    fn monitor() -> HealthMonitor {
        let config = HealthConfig {
            batch_delay_ms: 0,
            ..HealthConfig::default()
        };
        HealthMonitor::new(Arc::new(RpcProber::new(config, Arc::new(OkTransport))))
    }

    fn chain(urls: &[&str]) -> ChainRecord {
        ChainRecord::new(
            1,
            "Ethereum",
            NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
        )
        .with_rpc_urls(urls.iter().copied())
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let urls: Vec<String> = (0..12)
            .map(|i| format!("https://rpc{}.example.org", i))
            .collect();
        let results = monitor().test_multiple_rpcs(&urls).await;

        assert_eq!(results.len(), 12);
        for (url, health) in urls.iter().zip(&results) {
            assert_eq!(&health.url, url);
        }
    }

    #[tokio::test]
    async fn test_empty_url_list() {
        assert!(monitor().test_multiple_rpcs(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_check_chain_summary() {
        let report = monitor()
            .check_chain(&chain(&["https://up.example.org", "https://down.example.org"]))
            .await;

        assert_eq!(report.chain_id, 1);
        assert_eq!(report.endpoints[0].status, EndpointStatus::Online);
        assert_eq!(report.endpoints[1].status, EndpointStatus::Offline);
        let summary = report.summary.unwrap();
        assert_eq!(summary.reliability_pct, 50.0);
    }

    #[tokio::test]
    async fn test_known_health_marks_unprobed_as_unknown() {
        let monitor = monitor();
        let record = chain(&["https://a.example.org", "https://b.example.org"]);

        monitor.check_health("https://a.example.org").await;
        let known = monitor.known_health(&record);

        assert_eq!(known[0].status, EndpointStatus::Online);
        assert_eq!(known[1].status, EndpointStatus::Unknown);
    }

    #[tokio::test]
    async fn test_known_health_keeps_rejected_urls_offline() {
        let monitor = monitor();
        let record = chain(&[
            "wss://ethereum-rpc.publicnode.com",
            "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
        ]);

        let probed = monitor.check_chain(&record).await;
        let known = monitor.known_health(&record);

        for (p, k) in probed.endpoints.iter().zip(&known) {
            assert_eq!(p.status, EndpointStatus::Offline);
            assert_eq!(k.status, EndpointStatus::Offline);
            assert_eq!(p.detail, k.detail);
        }
    }
}
