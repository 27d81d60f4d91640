// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Operator-maintained registry in the crate's own record schema
//!
//! This is the only source that can mark chains as verified or attach tags,
//! so it is consulted first when configured.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::chains::types::ChainRecord;

use super::http::HttpJsonClient;
use super::source::ChainSource;
use super::types::FetchError;

pub const CURATED_SOURCE: &str = "curated";

pub struct CuratedRegistrySource {
    url: Option<String>,
    client: HttpJsonClient,
}

impl CuratedRegistrySource {
    pub fn new(url: Option<String>, client: HttpJsonClient) -> Self {
        Self { url, client }
    }
}

/// Accepts either a bare array of records or `{"chains": [...]}`
pub fn parse_curated(payload: serde_json::Value) -> Result<Vec<ChainRecord>, FetchError> {
    let entries = match payload {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Object(mut map) => match map.remove("chains") {
            Some(serde_json::Value::Array(entries)) => entries,
            _ => {
                return Err(FetchError::Parse {
                    source_name: CURATED_SOURCE.to_string(),
                    message: "object payload has no 'chains' array".to_string(),
                })
            }
        },
        _ => {
            return Err(FetchError::Parse {
                source_name: CURATED_SOURCE.to_string(),
                message: "expected an array or an object with 'chains'".to_string(),
            })
        }
    };

    let total = entries.len();
    let records: Vec<ChainRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ChainRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping malformed curated entry: {}", e);
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            "curated: skipped {} of {} malformed entries",
            total - records.len(),
            total
        );
    }

    Ok(records)
}

#[async_trait]
impl ChainSource for CuratedRegistrySource {
    async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError> {
        let Some(url) = self.url.as_deref() else {
            return Ok(Vec::new());
        };
        let payload = self.client.get_json(CURATED_SOURCE, url).await?;
        parse_curated(payload)
    }

    fn name(&self) -> &'static str {
        CURATED_SOURCE
    }

    fn is_available(&self) -> bool {
        self.url.is_some()
    }

    fn priority(&self) -> u8 {
        5
    }
}
