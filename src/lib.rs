// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chains;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod fetcher;
pub mod health;
pub mod merger;
pub mod pipeline;
pub mod selector;

// Re-export the service entry points
pub use chains::{ChainRecord, MergedChainRecord};
pub use config::RegistryConfig;
pub use enrichment::EnrichmentFetcher;
pub use fetcher::{ChainRegistryFetcher, RegistrySnapshot};
pub use health::{EndpointHealth, EndpointStatus, HealthMonitor, RpcProber};
pub use merger::{ChainDataMerger, RefreshHandle};
pub use pipeline::{PipelineError, RegistryPipeline};
pub use selector::{select_wallet_safe_endpoints, RpcSelector, SelectionReport};
