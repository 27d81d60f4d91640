// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RPC probe tests
//!
//! Pre-flight rejection, bounded concurrency and result caching, driven by an
//! instrumented transport instead of the network.

use async_trait::async_trait;
use fabstir_chain_registry::health::{
    EndpointStatus, HealthConfig, HealthMonitor, ProbeError, RpcProber, RpcTransport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Transport that answers 200 after a delay and records concurrency
#[derive(Default)]
struct InstrumentedTransport {
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InstrumentedTransport {
    fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Default::default()
        })
    }
}

#[async_trait]
impl RpcTransport for InstrumentedTransport {
    async fn post_json(&self, _url: &str, _body: &serde_json::Value) -> Result<u16, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(200)
    }
}

fn test_config(batch_size: usize) -> HealthConfig {
    HealthConfig {
        batch_size,
        batch_delay_ms: 0,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_urls_never_reach_transport() {
        let transport = InstrumentedTransport::with_delay(Duration::ZERO);
        let prober = RpcProber::new(test_config(5), transport.clone());

        let invalid = [
            "not a url",
            "ftp://rpc.example.org",
            "http://127.0.0.1:8545",
            "http://192.168.1.10",
            "http://localhost:8545",
            "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
            "https://eth-mainnet.g.alchemy.com/v2/{API_KEY}",
            "https://127.0.0.1.nip.io",
            "https://localhost.attacker.com/rpc",
            "https://192-168-0-10.sslip.io",
        ];

        for url in invalid {
            let health = prober.check_health(url).await;
            assert_eq!(health.status, EndpointStatus::Offline, "{}", url);
            assert!(health.latency_ms.is_none());
            assert!(health.detail.is_some());
        }

        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        // Rejections are not cached
        assert_eq!(prober.cache_stats().total, 0);
    }

    #[tokio::test]
    async fn test_in_flight_probes_bounded_by_batch_size() {
        let transport = InstrumentedTransport::with_delay(Duration::from_millis(30));
        let prober = Arc::new(RpcProber::new(test_config(3), transport.clone()));
        let monitor = HealthMonitor::new(prober);

        let urls: Vec<String> = (0..10)
            .map(|i| format!("https://rpc{}.example.org", i))
            .collect();
        let results = monitor.test_multiple_rpcs(&urls).await;

        assert_eq!(results.len(), 10);
        for (health, url) in results.iter().zip(&urls) {
            assert_eq!(&health.url, url);
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 10);
        let max = transport.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {}", max);
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn test_second_check_within_ttl_is_served_from_cache() {
        let transport = InstrumentedTransport::with_delay(Duration::from_millis(5));
        let prober = RpcProber::new(test_config(5), transport.clone());

        let first = prober.check_health("https://ethereum.publicnode.com").await;
        let second = prober.check_health("https://ethereum.publicnode.com").await;

        assert!(first.status.is_reachable());
        assert_eq!(first, second);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(prober.has_fresh_result("https://ethereum.publicnode.com"));
    }

    #[tokio::test]
    async fn test_probe_timeout_marks_offline() {
        let transport = InstrumentedTransport::with_delay(Duration::from_millis(200));
        let config = HealthConfig {
            probe_timeout_ms: 20,
            ..test_config(5)
        };
        let prober = RpcProber::new(config, transport);

        let health = prober.check_health("https://slow.example.org").await;
        assert_eq!(health.status, EndpointStatus::Offline);
        assert!(health.latency_ms.is_none());
        assert_eq!(health.reliability_score, Some(0));
    }
}
