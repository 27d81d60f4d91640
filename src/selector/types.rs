// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Selection results

use serde::Serialize;

use crate::health::types::EndpointStatus;

/// Which rule produced the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionTier {
    /// Official provider, reachable within the latency ceiling
    Official = 1,
    /// Reliable-provider allowlist, reachable within the latency ceiling
    Reliable = 2,
    /// Any safe URL confirmed online
    ConfirmedOnline = 3,
    /// Statically safe and not confirmed offline
    StaticallySafe = 4,
}

impl SelectionTier {
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Official,
    Recommended,
    Standard,
}

/// How much health data backed the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthAvailability {
    /// At least one endpoint has a recent probe result
    Fresh,
    /// Probe results exist but all are older than the configured age
    Stale,
    /// No endpoint has been probed
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub url: String,
    pub score: i32,
    pub classification: Classification,
    pub status: EndpointStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub official: bool,
    pub reliable: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedUrl {
    pub url: String,
    pub reason: String,
}

/// Full account of one selection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    pub chain_id: u64,
    /// None when nothing was selected
    pub tier: Option<SelectionTier>,
    /// URLs safe to hand to the wallet, best first
    pub selected: Vec<String>,
    /// Every statically safe URL, best first
    pub candidates: Vec<ScoredCandidate>,
    /// URLs that failed the static safety rules
    pub rejected: Vec<RejectedUrl>,
    pub health: HealthAvailability,
}

impl SelectionReport {
    /// The caller must refuse to auto-register the network
    pub fn is_no_safe_endpoint(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn candidate(&self, url: &str) -> Option<&ScoredCandidate> {
        self.candidates.iter().find(|c| c.url == url)
    }
}
