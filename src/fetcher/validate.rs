// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-record sanity checks applied before records enter the accumulator

use crate::chains::types::{push_unique, ChainRecord};
use crate::chains::url::{hostname, is_valid_rpc_url};

use super::types::FetchError;

fn invalid(chain_id: u64, reason: &str) -> FetchError {
    FetchError::Validation {
        chain_id,
        reason: reason.to_string(),
    }
}

/// Normalize a registry URL for comparison and storage
///
/// Only surrounding whitespace and trailing slashes are removed; the rest of
/// the string is kept verbatim so template placeholders stay visible.
pub fn normalize_rpc_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Validate and clean a record
///
/// Rejects records without a chain id, name or currency symbol. Invalid RPC
/// URLs, empty faucets and explorers without a URL are dropped from an
/// otherwise valid record.
pub fn validate_record(mut record: ChainRecord) -> Result<ChainRecord, FetchError> {
    if record.chain_id == 0 {
        return Err(invalid(0, "chain id must be greater than 0"));
    }

    record.name = record.name.trim().to_string();
    if record.name.is_empty() {
        return Err(invalid(record.chain_id, "empty name"));
    }

    record.native_currency.symbol = record.native_currency.symbol.trim().to_string();
    if record.native_currency.symbol.is_empty() {
        return Err(invalid(record.chain_id, "empty native currency symbol"));
    }

    let mut rpc_urls = Vec::with_capacity(record.rpc_urls.len());
    for url in record.rpc_urls.drain(..) {
        let url = normalize_rpc_url(&url);
        if is_valid_rpc_url(&url) {
            push_unique(&mut rpc_urls, url);
        }
    }
    record.rpc_urls = rpc_urls;

    let mut faucets = Vec::with_capacity(record.faucets.len());
    for faucet in record.faucets.drain(..) {
        let faucet = faucet.trim().to_string();
        if !faucet.is_empty() {
            push_unique(&mut faucets, faucet);
        }
    }
    record.faucets = faucets;

    record.explorers.retain(|e| !e.url.trim().is_empty());
    for explorer in &mut record.explorers {
        if explorer.name.trim().is_empty() {
            explorer.name = hostname(&explorer.url).unwrap_or_else(|| explorer.url.clone());
        }
    }

    record.bridges.retain(|b| !b.name.trim().is_empty());
    record.features.retain(|f| !f.trim().is_empty());
    record.short_name = record.short_name.trim().to_string();

    Ok(record)
}
