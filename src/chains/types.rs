// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical chain record types shared by the fetcher, merger and selector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::health::types::{ChainHealthSummary, EndpointHealth};

/// Native currency of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Block explorer entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explorer {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
}

/// Lifecycle status advertised by the registry sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    #[default]
    Active,
    Deprecated,
    Incubating,
}

impl ChainStatus {
    /// Parse the free-form status strings used by ethereum-lists
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "deprecated" => ChainStatus::Deprecated,
            "incubating" => ChainStatus::Incubating,
            _ => ChainStatus::Active,
        }
    }
}

/// Relationship of a chain to the chain it settles on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentKind {
    L2,
    #[serde(rename = "sidechain")]
    Sidechain,
    #[serde(rename = "rollup")]
    Rollup,
}

impl ParentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "l2" => Some(ParentKind::L2),
            "sidechain" => Some(ParentKind::Sidechain),
            "rollup" => Some(ParentKind::Rollup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentChain {
    #[serde(rename = "type")]
    pub kind: ParentKind,
    /// Parent reference, e.g. `eip155-1`
    pub chain: String,
}

impl ParentChain {
    /// Numeric chain id of the parent when it uses the `eip155-<id>` form
    pub fn chain_id(&self) -> Option<u64> {
        self.chain
            .strip_prefix("eip155-")
            .and_then(|id| id.parse().ok())
    }
}

/// Bridge connecting a chain to other chains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bridge {
    pub name: String,
    #[serde(rename = "type", default = "default_bridge_type")]
    pub bridge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub chains: BTreeSet<String>,
    #[serde(default)]
    pub protocols: BTreeSet<String>,
}

fn default_bridge_type() -> String {
    "canonical".to_string()
}

impl Bridge {
    /// Identity used when merging bridge entries from several sources
    pub fn merge_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.bridge_type.to_lowercase())
    }
}

/// A chain as reconciled from the registry sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    pub chain_id: u64,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    /// URL slug, e.g. `ethereum`
    #[serde(default)]
    pub network: String,
    pub native_currency: NativeCurrency,
    #[serde(default, alias = "rpc")]
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub faucets: Vec<String>,
    #[serde(default)]
    pub explorers: Vec<Explorer>,
    #[serde(default, alias = "infoURL", skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(default)]
    pub status: ChainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub is_testnet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentChain>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub bridges: Vec<Bridge>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
}

impl ChainRecord {
    /// Create a record with the required fields and everything else empty
    pub fn new(chain_id: u64, name: impl Into<String>, currency: NativeCurrency) -> Self {
        Self {
            chain_id,
            name: name.into(),
            short_name: String::new(),
            network: String::new(),
            native_currency: currency,
            rpc_urls: Vec::new(),
            faucets: Vec::new(),
            explorers: Vec::new(),
            info_url: None,
            status: ChainStatus::Active,
            icon: None,
            verified: false,
            is_testnet: false,
            parent: None,
            features: Vec::new(),
            bridges: Vec::new(),
            tags: BTreeSet::new(),
            red_flags: Vec::new(),
        }
    }

    /// Builder-style helper for adding RPC URLs
    pub fn with_rpc_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            push_unique(&mut self.rpc_urls, url.into());
        }
        self
    }

    pub fn has_rpc_urls(&self) -> bool {
        !self.rpc_urls.is_empty()
    }
}

/// Append to a list keeping it free of duplicates
pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|existing| existing == &value) {
        list.push(value);
    }
}

/// A chain record after merging, enrichment and health attachment
///
/// Snapshots of these are published whole; a record is never mutated
/// after it has been handed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedChainRecord {
    #[serde(flatten)]
    pub chain: ChainRecord,
    /// Names of the sources that contributed to this record
    pub sources: Vec<String>,
    pub last_updated: DateTime<Utc>,
    /// None until at least one endpoint has been probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<ChainHealthSummary>,
    pub endpoints: Vec<EndpointHealth>,
    /// Weighted presence score, 0-100
    pub completeness: u8,
}

impl MergedChainRecord {
    pub fn chain_id(&self) -> u64 {
        self.chain.chain_id
    }

    pub fn name(&self) -> &str {
        &self.chain.name
    }

    /// Health record for one of this chain's endpoints
    pub fn endpoint_health(&self, url: &str) -> Option<&EndpointHealth> {
        self.endpoints.iter().find(|e| e.url == url)
    }

    pub fn reliability_pct(&self) -> f64 {
        self.health.as_ref().map(|h| h.reliability_pct).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth() -> NativeCurrency {
        NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }

    #[test]
    fn test_with_rpc_urls_deduplicates() {
        let record = ChainRecord::new(1, "Ethereum", eth())
            .with_rpc_urls(["https://a", "https://b", "https://a"]);
        assert_eq!(record.rpc_urls, vec!["https://a", "https://b"]);
    }

    #[test]
    fn test_chain_record_deserializes_with_defaults() {
        let json = r#"{
            "chainId": 10,
            "name": "OP Mainnet",
            "nativeCurrency": {"name": "Ether", "symbol": "ETH", "decimals": 18},
            "rpc": ["https://mainnet.optimism.io"],
            "parent": {"type": "L2", "chain": "eip155-1"},
            "verified": true
        }"#;

        let record: ChainRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.chain_id, 10);
        assert_eq!(record.rpc_urls, vec!["https://mainnet.optimism.io"]);
        assert!(record.verified);
        assert_eq!(record.status, ChainStatus::Active);
        assert_eq!(record.parent.unwrap().chain_id(), Some(1));
    }

    #[test]
    fn test_parent_kind_parse() {
        assert_eq!(ParentKind::parse("L2"), Some(ParentKind::L2));
        assert_eq!(ParentKind::parse("sidechain"), Some(ParentKind::Sidechain));
        assert_eq!(ParentKind::parse("shard"), None);
    }

    #[test]
    fn test_bridge_merge_key_ignores_case() {
        let a = Bridge {
            name: "Superbridge".to_string(),
            bridge_type: "Canonical".to_string(),
            url: None,
            chains: BTreeSet::new(),
            protocols: BTreeSet::new(),
        };
        let mut b = a.clone();
        b.name = "superbridge".to_string();
        assert_eq!(a.merge_key(), b.merge_key());
    }
}
