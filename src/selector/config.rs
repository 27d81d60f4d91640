// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Selector thresholds

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Maximum URLs handed to the wallet
    pub max_results: usize,
    /// Latency ceiling for tiers 1-2 when the pattern table has none for the chain
    pub default_latency_ceiling_ms: u64,
    /// Candidate score at or above which an endpoint is labelled official
    pub official_score_threshold: i32,
    /// Candidate score at or above which an endpoint is labelled recommended
    pub recommended_score_threshold: i32,
    /// Probe results older than this make health data "stale"
    pub health_max_age_secs: u64,
    /// External pattern table replacing the built-in one
    pub pattern_table_path: Option<PathBuf>,
}

impl SelectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_results: env::var("SELECTOR_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_results),
            default_latency_ceiling_ms: env::var("SELECTOR_LATENCY_CEILING_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_latency_ceiling_ms),
            official_score_threshold: env::var("SELECTOR_OFFICIAL_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.official_score_threshold),
            recommended_score_threshold: env::var("SELECTOR_RECOMMENDED_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.recommended_score_threshold),
            health_max_age_secs: env::var("SELECTOR_HEALTH_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.health_max_age_secs),
            pattern_table_path: env::var("PROVIDER_PATTERNS_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 {
            return Err("Selector max results must be greater than 0".to_string());
        }
        if self.default_latency_ceiling_ms == 0 {
            return Err("Selector latency ceiling must be greater than 0".to_string());
        }
        if self.recommended_score_threshold > self.official_score_threshold {
            return Err(
                "Recommended score threshold cannot exceed the official threshold".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            default_latency_ceiling_ms: 3_000,
            official_score_threshold: 150,
            recommended_score_threshold: 75,
            health_max_age_secs: 900,
            pattern_table_path: None,
        }
    }
}
