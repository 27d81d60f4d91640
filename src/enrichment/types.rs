// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Enrichment data and errors

use serde::Serialize;
use thiserror::Error;

use crate::chains::types::{Bridge, ChainRecord, ParentChain};
use crate::fetcher::types::FetchError;

/// Secondary metadata for one chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEnrichment {
    /// Chain id the document describes, which may differ from the one requested
    pub chain_id: u64,
    pub features: Vec<String>,
    pub bridges: Vec<Bridge>,
    pub parent: Option<ParentChain>,
}

impl ChainEnrichment {
    pub fn from_record(record: ChainRecord) -> Self {
        Self {
            chain_id: record.chain_id,
            features: record.features,
            bridges: record.bridges,
            parent: record.parent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.bridges.is_empty() && self.parent.is_none()
    }
}

#[derive(Debug, Clone, Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed enrichment for chain {chain_id}: {message}")]
    Parse { chain_id: u64, message: String },
}
