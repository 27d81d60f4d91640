// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! chainid.network registry source (ethereum-lists `chains.json`)

use async_trait::async_trait;

use crate::chains::types::ChainRecord;

use super::http::HttpJsonClient;
use super::raw::parse_chain_entries;
use super::source::ChainSource;
use super::types::FetchError;

pub const CHAINID_NETWORK_SOURCE: &str = "chainid.network";

pub struct ChainidNetworkSource {
    url: String,
    client: HttpJsonClient,
}

impl ChainidNetworkSource {
    pub fn new(url: impl Into<String>, client: HttpJsonClient) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl ChainSource for ChainidNetworkSource {
    async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError> {
        let payload = self
            .client
            .get_json(CHAINID_NETWORK_SOURCE, &self.url)
            .await?;
        parse_chain_entries(CHAINID_NETWORK_SOURCE, payload)
    }

    fn name(&self) -> &'static str {
        CHAINID_NETWORK_SOURCE
    }

    fn is_available(&self) -> bool {
        !self.url.is_empty()
    }

    fn priority(&self) -> u8 {
        20
    }
}
