// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for RPC endpoint health

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Liveness of an endpoint as of its last probe
///
/// `Unknown` means no probe has completed yet. It is never used to mean
/// "down"; only a completed probe can produce `Offline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    Online,
    Slow,
    Offline,
    Unknown,
}

impl EndpointStatus {
    /// Answered within the probe timeout
    pub fn is_reachable(&self) -> bool {
        matches!(self, EndpointStatus::Online | EndpointStatus::Slow)
    }

    pub fn is_probed(&self) -> bool {
        !matches!(self, EndpointStatus::Unknown)
    }
}

/// How much caller data an RPC operator is believed to log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingLevel {
    None,
    Limited,
    Yes,
}

/// Health record for a single RPC URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHealth {
    pub url: String,
    pub status: EndpointStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub tracking: TrackingLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<u8>,
    /// Why the last probe failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl EndpointHealth {
    /// Explicit "not yet probed" marker
    pub fn unprobed(url: impl Into<String>, tracking: TrackingLevel) -> Self {
        Self {
            url: url.into(),
            status: EndpointStatus::Unknown,
            latency_ms: None,
            tracking,
            last_checked_at: None,
            reliability_score: None,
            privacy_score: Some(super::privacy::privacy_score(tracking)),
            composite_score: None,
            detail: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == EndpointStatus::Online
    }

    pub fn is_offline(&self) -> bool {
        self.status == EndpointStatus::Offline
    }
}

/// Chain-level aggregation of endpoint health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainHealthSummary {
    /// Mean latency of endpoints that answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_latency_ms: Option<u64>,
    /// Share of probed endpoints that answered, 0-100
    pub reliability_pct: f64,
    /// Mean privacy score across all endpoints, 0-100
    pub privacy_pct: f64,
    pub total_endpoints: usize,
    pub probed_endpoints: usize,
    pub online_endpoints: usize,
}

impl ChainHealthSummary {
    /// Derive a summary; None when nothing has been probed yet
    pub fn from_endpoints(endpoints: &[EndpointHealth]) -> Option<Self> {
        let probed: Vec<&EndpointHealth> =
            endpoints.iter().filter(|e| e.status.is_probed()).collect();
        if probed.is_empty() {
            return None;
        }

        let reachable: Vec<&EndpointHealth> = probed
            .iter()
            .copied()
            .filter(|e| e.status.is_reachable())
            .collect();

        let latencies: Vec<u64> = reachable.iter().filter_map(|e| e.latency_ms).collect();
        let average_latency_ms = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<u64>() / latencies.len() as u64)
        };

        let reliability_pct = reachable.len() as f64 / probed.len() as f64 * 100.0;

        let privacy_scores: Vec<f64> = endpoints
            .iter()
            .filter_map(|e| e.privacy_score.map(f64::from))
            .collect();
        let privacy_pct = if privacy_scores.is_empty() {
            0.0
        } else {
            privacy_scores.iter().sum::<f64>() / privacy_scores.len() as f64
        };

        Some(Self {
            average_latency_ms,
            reliability_pct,
            privacy_pct,
            total_endpoints: endpoints.len(),
            probed_endpoints: probed.len(),
            online_endpoints: probed
                .iter()
                .filter(|e| e.status == EndpointStatus::Online)
                .count(),
        })
    }

    /// Zeroed summary used for chains that failed to merge
    pub fn zeroed(total_endpoints: usize) -> Self {
        Self {
            average_latency_ms: None,
            reliability_pct: 0.0,
            privacy_pct: 0.0,
            total_endpoints,
            probed_endpoints: 0,
            online_endpoints: 0,
        }
    }
}

/// Errors raised while probing an endpoint
///
/// These never escape `check_health`; they end up in `EndpointHealth::detail`.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Rate limited: {url}")]
    RateLimited { url: String },

    #[error("Probe timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),
}
