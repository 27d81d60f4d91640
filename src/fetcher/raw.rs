// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parser for the ethereum-lists chain entry shape
//!
//! Both chainlist's `rpcs.json` and chainid.network's `chains.json` publish an
//! array of entries in this shape; chainlist adds `chainSlug`, `isTestnet` and
//! object-form RPC entries.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::chains::types::{
    push_unique, Bridge, ChainRecord, ChainStatus, Explorer, NativeCurrency, ParentChain,
    ParentKind,
};
use crate::chains::url::hostname;

use super::types::FetchError;

const TESTNET_MARKERS: &[&str] = &[
    "testnet", "sepolia", "goerli", "holesky", "hoodi", "devnet", "ropsten", "rinkeby", "kovan",
];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRpc {
    Url(String),
    Entry { url: String },
}

impl RawRpc {
    fn into_url(self) -> String {
        match self {
            RawRpc::Url(url) | RawRpc::Entry { url } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: String,
    #[serde(default = "default_decimals")]
    decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

#[derive(Debug, Deserialize)]
struct RawExplorer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    standard: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawBridgeRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawParent {
    #[serde(rename = "type")]
    kind: String,
    chain: String,
    #[serde(default)]
    bridges: Vec<RawBridgeRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChain {
    name: String,
    chain_id: u64,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    chain_slug: Option<String>,
    native_currency: RawCurrency,
    #[serde(default)]
    rpc: Vec<RawRpc>,
    #[serde(default)]
    faucets: Vec<String>,
    #[serde(default)]
    explorers: Vec<RawExplorer>,
    #[serde(default, rename = "infoURL")]
    info_url: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    is_testnet: Option<bool>,
    #[serde(default)]
    parent: Option<RawParent>,
    #[serde(default)]
    features: Vec<RawFeature>,
    #[serde(default)]
    red_flags: Vec<String>,
}

impl RawChain {
    fn into_record(self) -> ChainRecord {
        let is_testnet = self.is_testnet.unwrap_or_else(|| looks_like_testnet(&self.name));
        let network = self
            .chain_slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&self.name));

        let mut record = ChainRecord::new(
            self.chain_id,
            self.name.trim(),
            NativeCurrency {
                name: self.native_currency.name,
                symbol: self.native_currency.symbol,
                decimals: self.native_currency.decimals,
            },
        )
        .with_rpc_urls(self.rpc.into_iter().map(RawRpc::into_url));

        record.short_name = self.short_name.unwrap_or_default();
        record.network = network;
        record.faucets = self.faucets;
        record.explorers = self
            .explorers
            .into_iter()
            .map(|e| Explorer {
                name: e.name,
                url: e.url,
                standard: e.standard,
            })
            .collect();
        record.info_url = self.info_url.filter(|u| !u.trim().is_empty());
        record.status = self
            .status
            .as_deref()
            .map(ChainStatus::parse)
            .unwrap_or_default();
        record.icon = self.icon.filter(|i| !i.trim().is_empty());
        record.is_testnet = is_testnet;
        for feature in self.features {
            push_unique(&mut record.features, feature.name);
        }
        record.red_flags = self.red_flags;

        if let Some(parent) = self.parent {
            match ParentKind::parse(&parent.kind) {
                Some(kind) => {
                    record.bridges = parent
                        .bridges
                        .iter()
                        .filter_map(|b| parent_bridge(&b.url, self.chain_id, &parent.chain))
                        .collect();
                    record.parent = Some(ParentChain {
                        kind,
                        chain: parent.chain,
                    });
                }
                None => debug!(
                    "Chain {} has unknown parent type '{}'",
                    self.chain_id, parent.kind
                ),
            }
        }

        record
    }
}

/// Bridge to the parent chain, named after the bridge UI's hostname
fn parent_bridge(url: &str, chain_id: u64, parent: &str) -> Option<Bridge> {
    let name = hostname(url)?;
    Some(Bridge {
        name,
        bridge_type: "canonical".to_string(),
        url: Some(url.to_string()),
        chains: [format!("eip155-{}", chain_id), parent.to_string()]
            .into_iter()
            .collect(),
        protocols: Default::default(),
    })
}

/// Heuristic for feeds that do not carry an explicit testnet flag
pub fn looks_like_testnet(name: &str) -> bool {
    let lower = name.to_lowercase();
    TESTNET_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Lowercase, dash-separated slug of a chain name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Parse a single ethereum-lists style entry, e.g. one `eip155-<id>.json`
pub fn parse_chain_entry(
    source_name: &str,
    payload: serde_json::Value,
) -> Result<ChainRecord, FetchError> {
    serde_json::from_value::<RawChain>(payload)
        .map(RawChain::into_record)
        .map_err(|e| FetchError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
}

/// Parse a JSON array of ethereum-lists style entries
///
/// Malformed entries are skipped; a payload that is not an array is an error.
pub fn parse_chain_entries(
    source_name: &str,
    payload: serde_json::Value,
) -> Result<Vec<ChainRecord>, FetchError> {
    let serde_json::Value::Array(entries) = payload else {
        return Err(FetchError::Parse {
            source_name: source_name.to_string(),
            message: "expected a JSON array of chains".to_string(),
        });
    };

    let total = entries.len();
    let mut records = Vec::with_capacity(total);
    for entry in entries {
        match serde_json::from_value::<RawChain>(entry) {
            Ok(raw) => records.push(raw.into_record()),
            Err(e) => debug!("Skipping malformed {} entry: {}", source_name, e),
        }
    }

    if records.len() < total {
        warn!(
            "{}: skipped {} of {} malformed entries",
            source_name,
            total - records.len(),
            total
        );
    }

    Ok(records)
}
