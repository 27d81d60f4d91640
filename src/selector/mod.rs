// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-safe RPC endpoint selection
//!
//! Tiered, deterministic ranking of a chain's RPC URLs using static safety
//! rules, a provider pattern table and whatever health data is attached.

pub mod config;
pub mod patterns;
pub mod scoring;
pub mod service;
pub mod types;

pub use config::SelectorConfig;
pub use patterns::{PatternTableError, ProviderPatternTable};
pub use service::{select_wallet_safe_endpoints, RpcSelector};
pub use types::{
    Classification, HealthAvailability, RejectedUrl, ScoredCandidate, SelectionReport,
    SelectionTier,
};
