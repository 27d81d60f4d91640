// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tracking-level classification of RPC operators
//!
//! Hostnames are matched by domain suffix against curated provider lists.
//! Anything not listed is assumed to track.

use crate::chains::url::hostname;

use super::types::TrackingLevel;

/// Operators with a published no-logging policy
const NO_TRACKING_PROVIDERS: &[&str] = &[
    "publicnode.com",
    "llamarpc.com",
    "1rpc.io",
    "drpc.org",
    "mevblocker.io",
    "flashbots.net",
    "merkle.io",
    "securerpc.com",
    "payload.de",
    "gateway.pokt.network",
    "lava.build",
];

/// Operators that keep limited, short-lived request logs
const LIMITED_TRACKING_PROVIDERS: &[&str] = &[
    "ankr.com",
    "cloudflare-eth.com",
    "blastapi.io",
    "blockpi.network",
    "nodereal.io",
    "omniatech.io",
    "chainstack.com",
    "getblock.io",
    "onfinality.io",
    "unifra.io",
    "meowrpc.com",
];

/// Classify an RPC URL by its hostname
pub fn classify_tracking(url: &str) -> TrackingLevel {
    let Some(host) = hostname(url) else {
        return TrackingLevel::Yes;
    };

    if matches_any(&host, NO_TRACKING_PROVIDERS) {
        TrackingLevel::None
    } else if matches_any(&host, LIMITED_TRACKING_PROVIDERS) {
        TrackingLevel::Limited
    } else {
        TrackingLevel::Yes
    }
}

/// Privacy sub-score, 0-100
pub fn privacy_score(level: TrackingLevel) -> u8 {
    match level {
        TrackingLevel::None => 100,
        TrackingLevel::Limited => 60,
        TrackingLevel::Yes => 20,
    }
}

fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}
