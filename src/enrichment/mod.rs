// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Secondary per-chain metadata (features, bridges, parent chain)

pub mod config;
pub mod service;
pub mod source;
pub mod types;

pub use config::EnrichmentConfig;
pub use service::EnrichmentFetcher;
pub use source::{EnrichmentSource, HttpEnrichmentSource};
pub use types::{ChainEnrichment, EnrichmentError};
