// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for registry fetching

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::chains::types::ChainRecord;

/// Errors that can occur while pulling chain records from a source
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, ...
    #[error("Network error from {source_name}: {message}")]
    Network {
        source_name: String,
        message: String,
    },

    /// Request exceeded the hard timeout
    #[error("{source_name} timed out after {timeout_ms}ms")]
    Timeout {
        source_name: String,
        timeout_ms: u64,
    },

    /// Non-success HTTP status
    #[error("{source_name} returned HTTP {status}")]
    HttpStatus { source_name: String, status: u16 },

    /// Payload was not in the expected shape
    #[error("Failed to parse {source_name} payload: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A record failed sanity checks
    #[error("Invalid record for chain {chain_id}: {reason}")]
    Validation { chain_id: u64, reason: String },
}

impl FetchError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::Timeout { .. } => true,
            FetchError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            FetchError::Parse { .. } | FetchError::Validation { .. } => false,
        }
    }
}

/// A reconciled record plus the names of the sources that contributed to it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcedRecord {
    pub record: ChainRecord,
    pub sources: Vec<String>,
}

/// Where a snapshot's records came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SnapshotOrigin {
    /// At least one live source answered
    Live,
    /// Every source failed; records are the bundled dataset
    Fallback { version: String },
}

/// Deduplicated registry as produced by one fetch pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    /// One entry per chain id, ascending
    pub records: Vec<SourcedRecord>,
    pub origin: SnapshotOrigin,
    pub fetched_at: DateTime<Utc>,
    /// Sources that failed or produced nothing during this pass
    pub failed_sources: Vec<String>,
}

impl RegistrySnapshot {
    pub fn chains(&self) -> impl Iterator<Item = &ChainRecord> {
        self.records.iter().map(|r| &r.record)
    }

    pub fn get(&self, chain_id: u64) -> Option<&SourcedRecord> {
        self.records
            .binary_search_by_key(&chain_id, |r| r.record.chain_id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, SnapshotOrigin::Fallback { .. })
    }
}
