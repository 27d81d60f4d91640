// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for RPC health probing

use std::env;
use std::time::Duration;

/// Configuration for the prober and health monitor
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Hard timeout for a single probe in milliseconds
    pub probe_timeout_ms: u64,
    /// Latency at or above which a responsive endpoint is `slow`
    pub slow_threshold_ms: u64,
    /// Number of probes run concurrently per batch
    pub batch_size: usize,
    /// Pause between consecutive batches in milliseconds
    pub batch_delay_ms: u64,
    /// Maximum probes per URL within one rate-limit window
    pub rate_limit_max_requests: u32,
    /// Rate-limit window in seconds
    pub rate_limit_window_secs: u64,
    /// How long a probe result is served from cache
    pub cache_ttl_secs: u64,
    /// Maximum number of URLs kept in the health cache
    pub max_cache_entries: usize,
}

impl HealthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            probe_timeout_ms: env::var("RPC_PROBE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.probe_timeout_ms),
            slow_threshold_ms: env::var("RPC_SLOW_THRESHOLD_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.slow_threshold_ms),
            batch_size: env::var("RPC_PROBE_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_size),
            batch_delay_ms: env::var("RPC_PROBE_BATCH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_delay_ms),
            rate_limit_max_requests: env::var("RPC_RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_max_requests),
            rate_limit_window_secs: env::var("RPC_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_window_secs),
            cache_ttl_secs: env::var("RPC_HEALTH_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            max_cache_entries: env::var("RPC_HEALTH_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cache_entries),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.probe_timeout_ms == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }
        if self.slow_threshold_ms == 0 || self.slow_threshold_ms > self.probe_timeout_ms {
            return Err("Slow threshold must be between 1 and the probe timeout".to_string());
        }
        if self.batch_size == 0 {
            return Err("Probe batch size must be at least 1".to_string());
        }
        if self.rate_limit_max_requests == 0 || self.rate_limit_window_secs == 0 {
            return Err("Rate limit must allow at least one request per window".to_string());
        }
        if self.max_cache_entries == 0 {
            return Err("Health cache must hold at least one entry".to_string());
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 10_000,
            slow_threshold_ms: 1_500,
            batch_size: 5,
            batch_delay_ms: 100,
            rate_limit_max_requests: 10,
            rate_limit_window_secs: 60,
            cache_ttl_secs: 300,
            max_cache_entries: 5_000,
        }
    }
}
