// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-chain enrichment source

use async_trait::async_trait;

use crate::fetcher::http::HttpJsonClient;
use crate::fetcher::raw::parse_chain_entry;
use crate::fetcher::types::FetchError;

use super::config::EnrichmentConfig;
use super::types::{ChainEnrichment, EnrichmentError};

pub const ETHEREUM_LISTS_SOURCE: &str = "ethereum-lists";

/// Secondary metadata lookup for a single chain
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// `Ok(None)` means the source has nothing for this chain
    async fn fetch_chain(&self, chain_id: u64) -> Result<Option<ChainEnrichment>, EnrichmentError>;

    fn name(&self) -> &'static str;
}

/// ethereum-lists per-chain documents (`eip155-<id>.json`)
pub struct HttpEnrichmentSource {
    client: HttpJsonClient,
    config: EnrichmentConfig,
}

impl HttpEnrichmentSource {
    pub fn new(config: EnrichmentConfig) -> Result<Self, EnrichmentError> {
        let client = HttpJsonClient::new(
            config.request_timeout(),
            1,
            std::time::Duration::from_millis(250),
        )?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EnrichmentSource for HttpEnrichmentSource {
    async fn fetch_chain(&self, chain_id: u64) -> Result<Option<ChainEnrichment>, EnrichmentError> {
        let url = self.config.url_for(chain_id);
        let Some(payload) = self
            .client
            .get_optional_json(ETHEREUM_LISTS_SOURCE, &url)
            .await?
        else {
            return Ok(None);
        };

        let record = parse_chain_entry(ETHEREUM_LISTS_SOURCE, payload).map_err(|e| match e {
            FetchError::Parse { message, .. } => EnrichmentError::Parse { chain_id, message },
            other => EnrichmentError::Fetch(other),
        })?;

        Ok(Some(ChainEnrichment::from_record(record)))
    }

    fn name(&self) -> &'static str {
        ETHEREUM_LISTS_SOURCE
    }
}
