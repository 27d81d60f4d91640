// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bundled static chain dataset
//!
//! Served by the fetcher when every live registry source fails, and by the
//! merger when the upstream pipeline produces nothing at all.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::error;

use super::types::{ChainRecord, Explorer, NativeCurrency};

const BUNDLED_JSON: &str = include_str!("../../data/fallback_chains.json");

/// Source name recorded in provenance for fallback records
pub const FALLBACK_SOURCE: &str = "bundled";

/// Versioned snapshot of well-known chains shipped with the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackDataset {
    pub version: String,
    pub chains: Vec<ChainRecord>,
}

static BUNDLED_DATASET: OnceLock<FallbackDataset> = OnceLock::new();

/// The bundled dataset, parsed once on first use
pub fn bundled_dataset() -> &'static FallbackDataset {
    BUNDLED_DATASET.get_or_init(|| match serde_json::from_str::<FallbackDataset>(BUNDLED_JSON) {
        Ok(dataset) if !dataset.chains.is_empty() => dataset,
        Ok(_) => {
            error!("Bundled chain dataset is empty, using built-in record");
            builtin_dataset()
        }
        Err(e) => {
            error!("Bundled chain dataset is malformed ({}), using built-in record", e);
            builtin_dataset()
        }
    })
}

fn builtin_dataset() -> FallbackDataset {
    FallbackDataset {
        version: "builtin".to_string(),
        chains: vec![minimal_chain()],
    }
}

/// Single well-known chain used as the last line of defence
pub fn minimal_chain() -> ChainRecord {
    let mut record = ChainRecord::new(
        1,
        "Ethereum Mainnet",
        NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        },
    )
    .with_rpc_urls([
        "https://ethereum-rpc.publicnode.com",
        "https://cloudflare-eth.com",
    ]);
    record.short_name = "eth".to_string();
    record.network = "ethereum".to_string();
    record.verified = true;
    record.info_url = Some("https://ethereum.org".to_string());
    record.explorers.push(Explorer {
        name: "etherscan".to_string(),
        url: "https://etherscan.io".to_string(),
        standard: Some("EIP3091".to_string()),
    });
    record
}
