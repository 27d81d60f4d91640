// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Versioned provider pattern table
//!
//! Loaded from TOML; a default table is compiled into the binary and can be
//! replaced at startup with an operator-maintained file.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

use crate::chains::url::hostname;

const BUILTIN_TABLE: &str = include_str!("../../data/provider_patterns.toml");

/// Highest table format version this build understands
pub const SUPPORTED_TABLE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PatternTableError {
    #[error("Failed to read pattern table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed pattern table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid provider pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported pattern table version {found} (max {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Invalid chain id key '{0}'")]
    InvalidChainId(String),
}

#[derive(Debug, Deserialize)]
struct RawTable {
    version: u32,
    #[serde(default)]
    reliable_domains: Vec<String>,
    #[serde(default)]
    generic: RawChainPatterns,
    #[serde(default)]
    chains: HashMap<String, RawChainPatterns>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChainPatterns {
    #[serde(default)]
    official: Vec<String>,
    #[serde(default)]
    max_latency_ms: Option<u64>,
}

#[derive(Debug, Default)]
struct ChainPatterns {
    official: Vec<Regex>,
    max_latency_ms: Option<u64>,
}

/// Official-provider regexes, reliable-provider domains and latency ceilings
#[derive(Debug, Default)]
pub struct ProviderPatternTable {
    version: u32,
    reliable_domains: Vec<String>,
    generic_official: Vec<Regex>,
    chains: BTreeMap<u64, ChainPatterns>,
}

fn compile(patterns: Vec<String>) -> Result<Vec<Regex>, PatternTableError> {
    patterns
        .into_iter()
        .map(|pattern| {
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternTableError::Regex { pattern, source })
        })
        .collect()
}

impl ProviderPatternTable {
    /// Parse a table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, PatternTableError> {
        let raw: RawTable = toml::from_str(text)?;

        if raw.version == 0 || raw.version > SUPPORTED_TABLE_VERSION {
            return Err(PatternTableError::UnsupportedVersion {
                found: raw.version,
                supported: SUPPORTED_TABLE_VERSION,
            });
        }

        let mut chains = BTreeMap::new();
        for (key, patterns) in raw.chains {
            let chain_id: u64 = key
                .trim()
                .parse()
                .map_err(|_| PatternTableError::InvalidChainId(key.clone()))?;
            chains.insert(
                chain_id,
                ChainPatterns {
                    official: compile(patterns.official)?,
                    max_latency_ms: patterns.max_latency_ms,
                },
            );
        }

        Ok(Self {
            version: raw.version,
            reliable_domains: raw
                .reliable_domains
                .into_iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            generic_official: compile(raw.generic.official)?,
            chains,
        })
    }

    /// Load a table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatternTableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&text)?;
        info!(
            "Loaded provider pattern table v{} from {} ({} chains)",
            table.version,
            path.display(),
            table.chains.len()
        );
        Ok(table)
    }

    /// The table compiled into the binary
    pub fn builtin() -> Result<Self, PatternTableError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Built-in table, or an empty one if the embedded copy is broken
    pub fn builtin_or_empty() -> Self {
        Self::builtin().unwrap_or_else(|e| {
            error!("Built-in provider pattern table is invalid: {}", e);
            Self::default()
        })
    }

    /// URL matches a per-chain or generic official pattern
    pub fn is_official(&self, chain_id: u64, url: &str) -> bool {
        let url = url.trim();
        self.chains
            .get(&chain_id)
            .map(|c| c.official.iter().any(|re| re.is_match(url)))
            .unwrap_or(false)
            || self.generic_official.iter().any(|re| re.is_match(url))
    }

    /// Hostname equals or is a subdomain of a reliable provider domain
    pub fn is_reliable(&self, url: &str) -> bool {
        let Some(host) = hostname(url) else {
            return false;
        };
        self.reliable_domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .map(|prefix| prefix.ends_with('.'))
                    .unwrap_or(false)
        })
    }

    /// Per-chain latency ceiling, if the table sets one
    pub fn latency_ceiling_ms(&self, chain_id: u64) -> Option<u64> {
        self.chains.get(&chain_id).and_then(|c| c.max_latency_ms)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn reliable_domains(&self) -> &[String] {
        &self.reliable_domains
    }

    pub fn generic_pattern_count(&self) -> usize {
        self.generic_official.len()
    }

    /// Chains with their own entry, with official pattern count and ceiling
    pub fn chain_entries(&self) -> impl Iterator<Item = (u64, usize, Option<u64>)> + '_ {
        self.chains
            .iter()
            .map(|(id, c)| (*id, c.official.len(), c.max_latency_ms))
    }
}
