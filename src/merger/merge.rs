// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pure merge of registry records, enrichment and health into the canonical list

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

use crate::chains::fallback::{minimal_chain, FALLBACK_SOURCE};
use crate::chains::types::{push_unique, ChainRecord, MergedChainRecord};
use crate::enrichment::types::ChainEnrichment;
use crate::fetcher::accumulator::merge_bridges;
use crate::fetcher::types::{RegistrySnapshot, SourcedRecord};
use crate::health::privacy::classify_tracking;
use crate::health::types::{ChainHealthSummary, EndpointHealth};

use super::types::MergeError;

const WEIGHT_NAME: u8 = 10;
const WEIGHT_CHAIN_ID: u8 = 10;
const WEIGHT_RPC: u8 = 30;
const WEIGHT_ICON: u8 = 10;
const WEIGHT_EXPLORERS: u8 = 10;
const WEIGHT_FEATURES: u8 = 10;
const WEIGHT_HEALTH: u8 = 10;
const WEIGHT_BRIDGES: u8 = 10;

/// Weighted presence score, 0-100
pub fn completeness(chain: &ChainRecord, health: Option<&ChainHealthSummary>) -> u8 {
    let checks = [
        (!chain.name.trim().is_empty(), WEIGHT_NAME),
        (chain.chain_id > 0, WEIGHT_CHAIN_ID),
        (chain.has_rpc_urls(), WEIGHT_RPC),
        (chain.icon.is_some(), WEIGHT_ICON),
        (!chain.explorers.is_empty(), WEIGHT_EXPLORERS),
        (!chain.features.is_empty(), WEIGHT_FEATURES),
        (health.is_some(), WEIGHT_HEALTH),
        (!chain.bridges.is_empty(), WEIGHT_BRIDGES),
    ];

    checks
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| *weight)
        .sum::<u8>()
        .min(100)
}

/// Canonical ordering: verified, completeness, mainnet, reliability, name, id
pub fn compare_records(a: &MergedChainRecord, b: &MergedChainRecord) -> Ordering {
    b.chain
        .verified
        .cmp(&a.chain.verified)
        .then_with(|| b.completeness.cmp(&a.completeness))
        .then_with(|| a.chain.is_testnet.cmp(&b.chain.is_testnet))
        .then_with(|| {
            b.reliability_pct()
                .partial_cmp(&a.reliability_pct())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.chain.name.to_lowercase().cmp(&b.chain.name.to_lowercase()))
        .then_with(|| a.chain.chain_id.cmp(&b.chain.chain_id))
}

pub fn sort_records(records: &mut [MergedChainRecord]) {
    records.sort_by(compare_records);
}

/// Build a merged record from a chain and its current endpoint health
pub fn with_health(
    chain: ChainRecord,
    sources: Vec<String>,
    endpoints: Vec<EndpointHealth>,
    now: DateTime<Utc>,
) -> MergedChainRecord {
    let health = ChainHealthSummary::from_endpoints(&endpoints);
    let completeness = completeness(&chain, health.as_ref());

    MergedChainRecord {
        chain,
        sources,
        last_updated: now,
        health,
        endpoints,
        completeness,
    }
}

fn unprobed_endpoints(chain: &ChainRecord) -> Vec<EndpointHealth> {
    chain
        .rpc_urls
        .iter()
        .map(|url| EndpointHealth::unprobed(url.clone(), classify_tracking(url)))
        .collect()
}

fn check_invariants(chain: &ChainRecord) -> Result<(), MergeError> {
    if chain.chain_id == 0 {
        return Err(MergeError::InvalidRecord {
            chain_id: 0,
            reason: "chain id must be greater than 0".to_string(),
        });
    }
    if chain.native_currency.symbol.trim().is_empty() {
        return Err(MergeError::InvalidRecord {
            chain_id: chain.chain_id,
            reason: "empty native currency symbol".to_string(),
        });
    }
    Ok(())
}

/// Apply enrichment to a chain record
pub fn apply_enrichment(chain: &mut ChainRecord, enrichment: &ChainEnrichment) -> Result<(), MergeError> {
    if enrichment.chain_id != chain.chain_id {
        return Err(MergeError::ChainIdMismatch {
            expected: chain.chain_id,
            found: enrichment.chain_id,
        });
    }

    for feature in &enrichment.features {
        push_unique(&mut chain.features, feature.clone());
    }
    merge_bridges(&mut chain.bridges, enrichment.bridges.clone());
    if chain.parent.is_none() {
        chain.parent = enrichment.parent.clone();
    }
    Ok(())
}

/// Merge one sourced record
pub fn merge_record<F>(
    sourced: &SourcedRecord,
    enrichment: Option<&ChainEnrichment>,
    health_lookup: &F,
    now: DateTime<Utc>,
) -> Result<MergedChainRecord, MergeError>
where
    F: Fn(&ChainRecord) -> Vec<EndpointHealth>,
{
    let mut chain = sourced.record.clone();
    check_invariants(&chain)?;

    if let Some(enrichment) = enrichment {
        apply_enrichment(&mut chain, enrichment)?;
    }

    let endpoints = health_lookup(&chain);
    Ok(with_health(chain, sourced.sources.clone(), endpoints, now))
}

/// Degraded record for a chain whose merge failed
pub fn unhealthy_record(sourced: &SourcedRecord, now: DateTime<Utc>) -> MergedChainRecord {
    let mut chain = sourced.record.clone();
    chain.bridges.clear();
    let endpoints = unprobed_endpoints(&chain);
    let health = Some(ChainHealthSummary::zeroed(endpoints.len()));
    let completeness = completeness(&chain, health.as_ref());

    MergedChainRecord {
        chain,
        sources: sourced.sources.clone(),
        last_updated: now,
        health,
        endpoints,
        completeness,
    }
}

/// Single built-in record published when the upstream produced nothing
pub fn minimal_fallback_records() -> Vec<MergedChainRecord> {
    let chain = minimal_chain();
    let endpoints = unprobed_endpoints(&chain);
    vec![with_health(
        chain,
        vec![FALLBACK_SOURCE.to_string()],
        endpoints,
        Utc::now(),
    )]
}

/// Merge every chain of a registry snapshot into the sorted canonical list
///
/// `health_lookup` supplies the current endpoint health for a chain and must
/// not perform I/O. A chain that fails to merge degrades to
/// [`unhealthy_record`] instead of failing the pass.
pub fn merge_all<F>(
    snapshot: &RegistrySnapshot,
    enrichment: &HashMap<u64, ChainEnrichment>,
    health_lookup: F,
) -> Vec<MergedChainRecord>
where
    F: Fn(&ChainRecord) -> Vec<EndpointHealth>,
{
    let now = Utc::now();
    let mut merged: Vec<MergedChainRecord> = snapshot
        .records
        .iter()
        .map(|sourced| {
            let chain_id = sourced.record.chain_id;
            match merge_record(sourced, enrichment.get(&chain_id), &health_lookup, now) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Merge failed for chain {}: {}", chain_id, e);
                    unhealthy_record(sourced, now)
                }
            }
        })
        .collect();

    sort_records(&mut merged);
    merged
}
