// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-endpoint RPC prober
//!
//! Validates, rate-limits and caches probes of individual RPC URLs.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::chains::url::check_probe_url;

use super::cache::{HealthCache, HealthCacheStats};
use super::config::HealthConfig;
use super::privacy::{classify_tracking, privacy_score};
use super::rate_limiter::ProbeRateLimiter;
use super::scoring::composite_score;
use super::transport::{ReqwestTransport, RpcTransport};
use super::types::{EndpointHealth, EndpointStatus, ProbeError, TrackingLevel};

/// Lightweight read used as the liveness probe
pub const PROBE_METHOD: &str = "eth_chainId";

/// JSON-RPC 2.0 body sent to every endpoint
pub fn probe_request() -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "method": PROBE_METHOD,
        "params": [],
        "id": 1
    })
}

/// Probes RPC URLs and owns the per-URL result cache
pub struct RpcProber {
    transport: Arc<dyn RpcTransport>,
    cache: HealthCache,
    rate_limiter: ProbeRateLimiter,
    config: HealthConfig,
}

impl RpcProber {
    pub fn new(config: HealthConfig, transport: Arc<dyn RpcTransport>) -> Self {
        let cache = HealthCache::new(config.cache_ttl_secs, config.max_cache_entries);
        let rate_limiter =
            ProbeRateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window());

        Self {
            transport,
            cache,
            rate_limiter,
            config,
        }
    }

    /// Create a prober that talks HTTP through reqwest
    pub fn with_http(config: HealthConfig) -> Result<Self, ProbeError> {
        let transport = ReqwestTransport::new(config.probe_timeout())?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Check the health of one RPC URL
    ///
    /// Never fails: invalid, rate-limited and unreachable URLs all come back
    /// as health records, with the reason in `detail`.
    pub async fn check_health(&self, url: &str) -> EndpointHealth {
        let url = url.trim();

        // Pre-flight validation happens before any I/O
        if let Some(rejected) = self.preflight(url) {
            return rejected;
        }
        let tracking = classify_tracking(url);

        if let Some(cached) = self.cache.get_fresh(url) {
            debug!("Health cache hit for: {}", url);
            return cached;
        }

        if let Err(e) = self.rate_limiter.check(url) {
            warn!("{}, serving last known result", e);
            return self
                .cache
                .get_stale(url)
                .unwrap_or_else(|| self.failed(url, tracking, e));
        }

        let health = self.probe(url, tracking).await;
        self.cache.record(health)
    }

    async fn probe(&self, url: &str, tracking: TrackingLevel) -> EndpointHealth {
        let body = probe_request();
        let timeout = self.config.probe_timeout();
        let start = Instant::now();

        // The timeout drops the in-flight request future, aborting the call
        let outcome = tokio::time::timeout(timeout, self.transport.post_json(url, &body)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(status)) if (200..300).contains(&status) => {
                let endpoint_status = if latency_ms < self.config.slow_threshold_ms {
                    EndpointStatus::Online
                } else {
                    EndpointStatus::Slow
                };
                debug!(
                    "Probe {} -> {:?} in {}ms",
                    url, endpoint_status, latency_ms
                );
                self.completed(url, tracking, endpoint_status, Some(latency_ms), None)
            }
            Ok(Ok(status)) => self.failed(url, tracking, ProbeError::HttpStatus(status)),
            Ok(Err(e)) => self.failed(url, tracking, e),
            Err(_) => self.failed(
                url,
                tracking,
                ProbeError::Timeout {
                    timeout_ms: self.config.probe_timeout_ms,
                },
            ),
        }
    }

    fn failed(&self, url: &str, tracking: TrackingLevel, error: ProbeError) -> EndpointHealth {
        debug!("Probe {} failed: {}", url, error);
        self.completed(
            url,
            tracking,
            EndpointStatus::Offline,
            None,
            Some(error.to_string()),
        )
    }

    fn completed(
        &self,
        url: &str,
        tracking: TrackingLevel,
        status: EndpointStatus,
        latency_ms: Option<u64>,
        detail: Option<String>,
    ) -> EndpointHealth {
        let privacy = privacy_score(tracking);
        EndpointHealth {
            url: url.to_string(),
            status,
            latency_ms,
            tracking,
            last_checked_at: Some(Utc::now()),
            reliability_score: None,
            privacy_score: Some(privacy),
            composite_score: Some(composite_score(status, latency_ms, privacy)),
            detail,
        }
    }

    /// Offline verdict for a URL that fails pre-flight validation
    ///
    /// Pure check, never cached; `None` means the URL may be probed.
    pub fn preflight(&self, url: &str) -> Option<EndpointHealth> {
        let url = url.trim();
        let reason = check_probe_url(url).err()?;
        debug!("Rejected RPC URL {}: {}", url, reason);
        Some(self.failed(
            url,
            classify_tracking(url),
            ProbeError::InvalidUrl {
                reason: reason.to_string(),
            },
        ))
    }

    /// Last known result for a URL, fresh or stale, without probing
    pub fn cached_health(&self, url: &str) -> Option<EndpointHealth> {
        self.cache.get_stale(url)
    }

    /// Whether a fresh (within TTL) result exists for a URL
    pub fn has_fresh_result(&self, url: &str) -> bool {
        self.cache.get_fresh(url).is_some()
    }

    pub fn cache_stats(&self) -> HealthCacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Housekeeping for long-running processes
    pub fn prune(&self) {
        self.cache.cleanup_expired();
        self.rate_limiter.retain_recent();
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }
}
