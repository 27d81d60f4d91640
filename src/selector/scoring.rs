// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Candidate scoring for wallet RPC selection

use crate::chains::url::is_https;
use crate::health::privacy::{classify_tracking, privacy_score};
use crate::health::types::{EndpointHealth, EndpointStatus};

use super::config::SelectorConfig;
use super::types::Classification;

const OFFICIAL_BONUS: i32 = 100;
const RELIABLE_BONUS: i32 = 50;
const ONLINE_BONUS: i32 = 75;
const SLOW_BONUS: i32 = 25;
const OFFLINE_PENALTY: i32 = -100;
const FAST_LATENCY_BONUS: i32 = 30;
const OK_LATENCY_BONUS: i32 = 15;
const RELIABILITY_BONUS: i32 = 25;
const PRIVACY_BONUS: i32 = 20;
const HTTPS_BONUS: i32 = 10;

/// Generic ranking score; higher is better
///
/// `health` is the endpoint's last completed probe, if any.
pub fn candidate_score(
    url: &str,
    official: bool,
    reliable: bool,
    health: Option<&EndpointHealth>,
) -> i32 {
    let mut score = 0;

    if official {
        score += OFFICIAL_BONUS;
    }
    if reliable {
        score += RELIABLE_BONUS;
    }

    if let Some(h) = health {
        score += match h.status {
            EndpointStatus::Online => ONLINE_BONUS,
            EndpointStatus::Slow => SLOW_BONUS,
            EndpointStatus::Offline => OFFLINE_PENALTY,
            EndpointStatus::Unknown => 0,
        };

        if h.status.is_reachable() {
            match h.latency_ms {
                Some(ms) if ms < 100 => score += FAST_LATENCY_BONUS,
                Some(ms) if ms < 500 => score += OK_LATENCY_BONUS,
                _ => {}
            }
        }

        if h.reliability_score.map(|r| r > 90).unwrap_or(false) {
            score += RELIABILITY_BONUS;
        }
    }

    let privacy = health
        .and_then(|h| h.privacy_score)
        .unwrap_or_else(|| privacy_score(classify_tracking(url)));
    if privacy >= 80 {
        score += PRIVACY_BONUS;
    }

    if is_https(url) {
        score += HTTPS_BONUS;
    }

    score
}

pub fn classify(score: i32, config: &SelectorConfig) -> Classification {
    if score >= config.official_score_threshold {
        Classification::Official
    } else if score >= config.recommended_score_threshold {
        Classification::Recommended
    } else {
        Classification::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::types::TrackingLevel;

    fn health(status: EndpointStatus, latency_ms: Option<u64>) -> EndpointHealth {
        EndpointHealth {
            status,
            latency_ms,
            reliability_score: Some(100),
            ..EndpointHealth::unprobed("https://rpc.example.org", TrackingLevel::Yes)
        }
    }

    #[test]
    fn test_online_beats_offline() {
        let online = health(EndpointStatus::Online, Some(200));
        let offline = health(EndpointStatus::Offline, None);
        let url = "https://rpc.example.org";

        assert!(
            candidate_score(url, false, false, Some(&online))
                > candidate_score(url, false, false, Some(&offline))
        );
    }

    #[test]
    fn test_official_fast_endpoint_ranks_highest() {
        let fast = health(EndpointStatus::Online, Some(50));
        let official = candidate_score("https://mainnet.base.org", true, false, Some(&fast));
        let reliable = candidate_score("https://base.llamarpc.com", false, true, Some(&fast));
        let plain = candidate_score("https://rpc.example.org", false, false, Some(&fast));

        assert!(official > reliable);
        assert!(reliable > plain);
    }

    #[test]
    fn test_unknown_health_adds_nothing() {
        let unknown = EndpointHealth::unprobed("https://rpc.example.org", TrackingLevel::Yes);
        let url = "https://rpc.example.org";
        assert_eq!(
            candidate_score(url, false, false, Some(&unknown)),
            candidate_score(url, false, false, None)
        );
    }

    #[test]
    fn test_classification_thresholds() {
        let config = SelectorConfig::default();
        assert_eq!(classify(235, &config), Classification::Official);
        assert_eq!(classify(100, &config), Classification::Recommended);
        assert_eq!(classify(10, &config), Classification::Standard);
    }
}
