// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the chain registry fetcher

use std::env;
use std::time::Duration;

pub const DEFAULT_CHAINLIST_URL: &str = "https://chainlist.org/rpcs.json";
pub const DEFAULT_CHAINID_NETWORK_URL: &str = "https://chainid.network/chains.json";

/// Configuration for registry sources, retries and snapshot caching
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// chainlist rpcs.json endpoint
    pub chainlist_url: String,
    /// ethereum-lists chains.json endpoint
    pub chainid_network_url: String,
    /// Operator-maintained registry in our own schema (disabled when unset)
    pub curated_registry_url: Option<String>,
    /// Hard timeout per HTTP request in milliseconds
    pub request_timeout_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff (base, 2x base, ...)
    pub retry_base_delay_ms: u64,
    /// How long a live snapshot is served from memory
    pub cache_ttl_secs: u64,
    /// A single source yielding more valid records than this ends the pass
    pub early_exit_min_records: usize,
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chainlist_url: env::var("CHAINLIST_URL").unwrap_or(defaults.chainlist_url),
            chainid_network_url: env::var("CHAINID_NETWORK_URL")
                .unwrap_or(defaults.chainid_network_url),
            curated_registry_url: env::var("CURATED_REGISTRY_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout_ms: env::var("REGISTRY_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            max_retries: env::var("REGISTRY_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_base_delay_ms: env::var("REGISTRY_RETRY_BASE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_base_delay_ms),
            cache_ttl_secs: env::var("REGISTRY_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            early_exit_min_records: env::var("REGISTRY_EARLY_EXIT_MIN_RECORDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.early_exit_min_records),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("Registry request timeout must be greater than 0".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("Registry cache TTL must be greater than 0".to_string());
        }
        if self.max_retries > 5 {
            return Err("Registry retries are capped at 5".to_string());
        }
        for url in [&self.chainlist_url, &self.chainid_network_url]
            .into_iter()
            .chain(self.curated_registry_url.as_ref())
        {
            if url::Url::parse(url).is_err() {
                return Err(format!("Invalid registry source URL: {}", url));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            chainlist_url: DEFAULT_CHAINLIST_URL.to_string(),
            chainid_network_url: DEFAULT_CHAINID_NETWORK_URL.to_string(),
            curated_registry_url: None,
            request_timeout_ms: 15_000,
            max_retries: 2,
            retry_base_delay_ms: 500,
            cache_ttl_secs: 300,
            early_exit_min_records: 1_000,
        }
    }
}
