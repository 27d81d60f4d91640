// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health refresh configuration

use std::env;
use std::time::Duration;

/// Chains probed on every refresh regardless of verification status
pub const DEFAULT_POPULAR_CHAIN_IDS: &[u64] = &[1, 10, 56, 137, 8453, 42161, 43114, 11155111];

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub popular_chain_ids: Vec<u64>,
    /// Upper bound on chains re-probed per refresh
    pub max_chains: usize,
    pub interval_secs: u64,
}

impl RefreshConfig {
    /// Load configuration from environment variables
    ///
    /// `REFRESH_POPULAR_CHAIN_IDS` is a comma-separated id list.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            popular_chain_ids: env::var("REFRESH_POPULAR_CHAIN_IDS")
                .ok()
                .map(|v| parse_chain_ids(&v))
                .filter(|ids| !ids.is_empty())
                .unwrap_or(defaults.popular_chain_ids),
            max_chains: env::var("REFRESH_MAX_CHAINS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chains),
            interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.interval_secs),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval_secs == 0 {
            return Err("Refresh interval must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn parse_chain_ids(value: &str) -> Vec<u64> {
    value
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            popular_chain_ids: DEFAULT_POPULAR_CHAIN_IDS.to_vec(),
            max_chains: 20,
            interval_secs: 300,
        }
    }
}
