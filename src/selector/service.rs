// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-safe endpoint selection
//!
//! Pure and synchronous: decisions use only the chain record, its attached
//! endpoint health and the pattern table. An empty result means the caller
//! must not auto-register the network.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::chains::types::MergedChainRecord;
use crate::chains::url::{check_probe_url, is_https};
use crate::health::types::{EndpointHealth, EndpointStatus};

use super::config::SelectorConfig;
use super::patterns::{PatternTableError, ProviderPatternTable};
use super::scoring::{candidate_score, classify};
use super::types::{
    HealthAvailability, RejectedUrl, ScoredCandidate, SelectionReport, SelectionTier,
};

struct Candidate<'a> {
    url: &'a str,
    official: bool,
    reliable: bool,
    health: Option<&'a EndpointHealth>,
    score: i32,
}

impl Candidate<'_> {
    /// Online within the ceiling, or no health data at all
    fn passes_health_gate(&self, ceiling_ms: u64) -> bool {
        match self.health {
            None => true,
            Some(h) => {
                h.status == EndpointStatus::Online
                    && h.latency_ms.map(|ms| ms < ceiling_ms).unwrap_or(true)
            }
        }
    }

    fn status(&self) -> EndpointStatus {
        self.health
            .map(|h| h.status)
            .unwrap_or(EndpointStatus::Unknown)
    }

    fn in_tier(&self, tier: SelectionTier, ceiling_ms: u64) -> bool {
        match tier {
            SelectionTier::Official => self.official && self.passes_health_gate(ceiling_ms),
            SelectionTier::Reliable => self.reliable && self.passes_health_gate(ceiling_ms),
            SelectionTier::ConfirmedOnline => self.status() == EndpointStatus::Online,
            SelectionTier::StaticallySafe => self.status() != EndpointStatus::Offline,
        }
    }
}

const TIERS: [SelectionTier; 4] = [
    SelectionTier::Official,
    SelectionTier::Reliable,
    SelectionTier::ConfirmedOnline,
    SelectionTier::StaticallySafe,
];

pub struct RpcSelector {
    table: Arc<ProviderPatternTable>,
    config: SelectorConfig,
}

impl RpcSelector {
    /// Create a selector, loading the external pattern table if configured
    pub fn new(config: SelectorConfig) -> Result<Self, PatternTableError> {
        let table = match &config.pattern_table_path {
            Some(path) => ProviderPatternTable::load(path)?,
            None => ProviderPatternTable::builtin()?,
        };
        Ok(Self::with_table(config, Arc::new(table)))
    }

    pub fn with_table(config: SelectorConfig, table: Arc<ProviderPatternTable>) -> Self {
        Self { table, config }
    }

    /// Wallet-safe URLs for a chain, best first
    pub fn select(&self, chain: &MergedChainRecord) -> Vec<String> {
        self.report(chain).selected
    }

    /// Selection with the tier, candidate scores and health availability
    pub fn report(&self, chain: &MergedChainRecord) -> SelectionReport {
        self.report_at(chain, Utc::now())
    }

    /// Same as [`report`](Self::report) with an explicit clock for staleness
    pub fn report_at(&self, chain: &MergedChainRecord, now: DateTime<Utc>) -> SelectionReport {
        self.rank(chain.chain_id(), &chain.chain.rpc_urls, &chain.endpoints, now)
    }

    /// Rank an arbitrary URL list against the health records available for it
    pub fn rank(
        &self,
        chain_id: u64,
        urls: &[String],
        endpoints: &[EndpointHealth],
        now: DateTime<Utc>,
    ) -> SelectionReport {
        let mut seen = HashSet::new();
        let mut rejected = Vec::new();
        let mut candidates = Vec::new();

        for url in urls {
            let url = url.as_str();
            if !seen.insert(url) {
                continue;
            }

            if let Some(reason) = rejection_reason(url) {
                rejected.push(RejectedUrl {
                    url: url.to_string(),
                    reason,
                });
                continue;
            }

            let official = self.table.is_official(chain_id, url);
            let reliable = self.table.is_reliable(url);
            let health = endpoints
                .iter()
                .find(|e| e.url == url && e.status.is_probed());

            candidates.push(Candidate {
                url,
                official,
                reliable,
                health,
                score: candidate_score(url, official, reliable, health),
            });
        }

        // Stable: equal scores keep source order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        let ceiling_ms = self
            .table
            .latency_ceiling_ms(chain_id)
            .unwrap_or(self.config.default_latency_ceiling_ms);

        let mut tier = None;
        let mut selected = Vec::new();
        for candidate_tier in TIERS {
            selected = candidates
                .iter()
                .filter(|c| c.in_tier(candidate_tier, ceiling_ms))
                .take(self.config.max_results)
                .map(|c| c.url.to_string())
                .collect();
            if !selected.is_empty() {
                tier = Some(candidate_tier);
                break;
            }
        }

        let health = self.health_availability(endpoints, now);

        debug!(
            "Chain {}: selected {} of {} URLs (tier {:?}, health {:?}, {} rejected)",
            chain_id,
            selected.len(),
            urls.len(),
            tier,
            health,
            rejected.len()
        );

        SelectionReport {
            chain_id,
            tier,
            selected,
            candidates: candidates
                .iter()
                .map(|c| ScoredCandidate {
                    url: c.url.to_string(),
                    score: c.score,
                    classification: classify(c.score, &self.config),
                    status: c.status(),
                    latency_ms: c.health.and_then(|h| h.latency_ms),
                    official: c.official,
                    reliable: c.reliable,
                })
                .collect(),
            rejected,
            health,
        }
    }

    fn health_availability(
        &self,
        endpoints: &[EndpointHealth],
        now: DateTime<Utc>,
    ) -> HealthAvailability {
        let probed: Vec<&EndpointHealth> =
            endpoints.iter().filter(|e| e.status.is_probed()).collect();
        if probed.is_empty() {
            return HealthAvailability::Unavailable;
        }

        let max_age = ChronoDuration::seconds(self.config.health_max_age_secs as i64);
        let fresh = probed
            .iter()
            .filter_map(|e| e.last_checked_at)
            .any(|checked| now - checked <= max_age);

        if fresh {
            HealthAvailability::Fresh
        } else {
            HealthAvailability::Stale
        }
    }

    pub fn table(&self) -> &Arc<ProviderPatternTable> {
        &self.table
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

fn rejection_reason(url: &str) -> Option<String> {
    if let Err(e) = check_probe_url(url) {
        return Some(e.to_string());
    }
    if !is_https(url) {
        return Some("not https".to_string());
    }
    None
}

static DEFAULT_SELECTOR: OnceLock<RpcSelector> = OnceLock::new();

/// Wallet-safe URLs for a chain using the built-in pattern table
pub fn select_wallet_safe_endpoints(chain: &MergedChainRecord) -> Vec<String> {
    DEFAULT_SELECTOR
        .get_or_init(|| {
            RpcSelector::with_table(
                SelectorConfig::default(),
                Arc::new(ProviderPatternTable::builtin_or_empty()),
            )
        })
        .select(chain)
}
