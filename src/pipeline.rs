// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wiring of the fetcher, prober, monitor, merger and selector

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::RegistryConfig;
use crate::enrichment::service::EnrichmentFetcher;
use crate::enrichment::source::HttpEnrichmentSource;
use crate::enrichment::types::EnrichmentError;
use crate::fetcher::service::ChainRegistryFetcher;
use crate::fetcher::types::FetchError;
use crate::health::monitor::HealthMonitor;
use crate::health::prober::RpcProber;
use crate::health::types::ProbeError;
use crate::merger::service::ChainDataMerger;
use crate::selector::patterns::PatternTableError;
use crate::selector::service::RpcSelector;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Patterns(#[from] PatternTableError),
}

/// Service objects shared by the binaries, created once and passed by `Arc`
pub struct RegistryPipeline {
    pub fetcher: Arc<ChainRegistryFetcher>,
    pub prober: Arc<RpcProber>,
    pub monitor: Arc<HealthMonitor>,
    pub merger: Arc<ChainDataMerger>,
    pub selector: Arc<RpcSelector>,
}

impl RegistryPipeline {
    pub fn from_config(config: &RegistryConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let fetcher = Arc::new(ChainRegistryFetcher::new(config.fetcher.clone())?);
        let prober = Arc::new(RpcProber::with_http(config.health.clone())?);
        let monitor = Arc::new(HealthMonitor::new(Arc::clone(&prober)));

        let enrichment = if config.enrichment_disabled {
            None
        } else {
            let source = HttpEnrichmentSource::new(config.enrichment.clone())?;
            Some(EnrichmentFetcher::new(
                Arc::new(source),
                config.enrichment.clone(),
            ))
        };

        let merger = Arc::new(ChainDataMerger::new(
            fetcher.clone(),
            enrichment,
            Arc::clone(&monitor),
            config.refresh.clone(),
        ));
        let selector = Arc::new(RpcSelector::new(config.selector.clone())?);

        info!(
            "Registry pipeline ready: sources [{}], pattern table v{}",
            fetcher.source_names().join(", "),
            selector.table().version()
        );

        Ok(Self {
            fetcher,
            prober,
            monitor,
            merger,
            selector,
        })
    }
}
