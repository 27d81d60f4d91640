// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Aggregate configuration for the registry pipeline

use std::env;

use crate::enrichment::config::EnrichmentConfig;
use crate::fetcher::config::FetcherConfig;
use crate::health::config::HealthConfig;
use crate::merger::config::RefreshConfig;
use crate::selector::config::SelectorConfig;

#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub fetcher: FetcherConfig,
    pub health: HealthConfig,
    pub enrichment: EnrichmentConfig,
    /// Skip the enrichment pass entirely
    pub enrichment_disabled: bool,
    pub selector: SelectorConfig,
    pub refresh: RefreshConfig,
}

impl RegistryConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            fetcher: FetcherConfig::from_env(),
            health: HealthConfig::from_env(),
            enrichment: EnrichmentConfig::from_env(),
            enrichment_disabled: env::var("ENRICHMENT_DISABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            selector: SelectorConfig::from_env(),
            refresh: RefreshConfig::from_env(),
        }
    }

    /// Validate every section, reporting the first failure
    pub fn validate(&self) -> Result<(), String> {
        self.fetcher.validate()?;
        self.health.validate()?;
        if !self.enrichment_disabled {
            self.enrichment.validate()?;
        }
        self.selector.validate()?;
        self.refresh.validate()?;
        Ok(())
    }
}
