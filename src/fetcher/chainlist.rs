// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! chainlist.org registry source
//!
//! Preferred public feed: `rpcs.json` carries slugs, explicit testnet flags
//! and a curated RPC list per chain.

use async_trait::async_trait;

use crate::chains::types::ChainRecord;

use super::http::HttpJsonClient;
use super::raw::parse_chain_entries;
use super::source::ChainSource;
use super::types::FetchError;

pub const CHAINLIST_SOURCE: &str = "chainlist";

pub struct ChainlistSource {
    url: String,
    client: HttpJsonClient,
}

impl ChainlistSource {
    pub fn new(url: impl Into<String>, client: HttpJsonClient) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl ChainSource for ChainlistSource {
    async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError> {
        let payload = self.client.get_json(CHAINLIST_SOURCE, &self.url).await?;
        parse_chain_entries(CHAINLIST_SOURCE, payload)
    }

    fn name(&self) -> &'static str {
        CHAINLIST_SOURCE
    }

    fn is_available(&self) -> bool {
        !self.url.is_empty()
    }

    fn priority(&self) -> u8 {
        10
    }
}
