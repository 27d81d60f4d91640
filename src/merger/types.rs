// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Merger errors

use thiserror::Error;

/// Upstream registry load failures
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("All registry sources failed")]
    AllSourcesFailed,

    #[error("Registry upstream error: {0}")]
    Upstream(String),
}

/// Per-chain merge failures; the affected chain degrades to a minimal record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("Enrichment for chain {found} attached to chain {expected}")]
    ChainIdMismatch { expected: u64, found: u64 },

    #[error("Chain {chain_id} violates record invariants: {reason}")]
    InvalidRecord { chain_id: u64, reason: String },
}
