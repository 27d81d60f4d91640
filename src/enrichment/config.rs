// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for per-chain enrichment fetching

use std::env;
use std::time::Duration;

pub const DEFAULT_ENRICHMENT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/ethereum-lists/chains/master/_data/chains/eip155-{id}.json";

/// Bounds for the enrichment pass
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Per-chain document URL; `{id}` is replaced with the chain id
    pub url_template: String,
    /// Upper bound on chains enriched per pass
    pub max_chains: usize,
    /// Unverified chains are only eligible below this id
    pub chain_id_ceiling: u64,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub request_timeout_ms: u64,
}

impl EnrichmentConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url_template: env::var("ENRICHMENT_URL_TEMPLATE").unwrap_or(defaults.url_template),
            max_chains: env::var("ENRICHMENT_MAX_CHAINS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chains),
            chain_id_ceiling: env::var("ENRICHMENT_CHAIN_ID_CEILING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chain_id_ceiling),
            batch_size: env::var("ENRICHMENT_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_size),
            batch_delay_ms: env::var("ENRICHMENT_BATCH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_delay_ms),
            request_timeout_ms: env::var("ENRICHMENT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.url_template.contains("{id}") {
            return Err("Enrichment URL template must contain {id}".to_string());
        }
        if self.batch_size == 0 {
            return Err("Enrichment batch size must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Enrichment timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Document URL for one chain
    pub fn url_for(&self, chain_id: u64) -> String {
        self.url_template.replace("{id}", &chain_id.to_string())
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_ENRICHMENT_URL_TEMPLATE.to_string(),
            max_chains: 100,
            chain_id_ceiling: 100_000,
            batch_size: 10,
            batch_delay_ms: 200,
            request_timeout_ms: 10_000,
        }
    }
}
