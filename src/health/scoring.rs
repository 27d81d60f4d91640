// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Composite endpoint score
//!
//! status 40% + latency band 30% + privacy 30%, clamped to 0-100.

use super::types::EndpointStatus;

const STATUS_WEIGHT: f64 = 0.4;
const LATENCY_WEIGHT: f64 = 0.3;
const PRIVACY_WEIGHT: f64 = 0.3;

fn status_points(status: EndpointStatus) -> f64 {
    match status {
        EndpointStatus::Online => 100.0,
        EndpointStatus::Slow => 50.0,
        EndpointStatus::Offline | EndpointStatus::Unknown => 0.0,
    }
}

/// Latency band points, finer at the fast end
pub fn latency_points(latency_ms: Option<u64>) -> f64 {
    match latency_ms {
        Some(ms) if ms < 100 => 100.0,
        Some(ms) if ms < 500 => 80.0,
        Some(ms) if ms < 1_000 => 60.0,
        Some(ms) if ms < 5_000 => 30.0,
        _ => 0.0,
    }
}

pub fn composite_score(status: EndpointStatus, latency_ms: Option<u64>, privacy_score: u8) -> u8 {
    // Latency is meaningless for an endpoint that never answered
    let latency = if status.is_reachable() { latency_ms } else { None };

    let score = status_points(status) * STATUS_WEIGHT
        + latency_points(latency) * LATENCY_WEIGHT
        + f64::from(privacy_score) * PRIVACY_WEIGHT;

    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_endpoint_scores_100() {
        assert_eq!(composite_score(EndpointStatus::Online, Some(50), 100), 100);
    }

    #[test]
    fn test_offline_endpoint_only_keeps_privacy() {
        assert_eq!(composite_score(EndpointStatus::Offline, Some(50), 100), 30);
        assert_eq!(composite_score(EndpointStatus::Offline, None, 20), 6);
    }

    #[test]
    fn test_latency_bands() {
        assert_eq!(latency_points(Some(99)), 100.0);
        assert_eq!(latency_points(Some(100)), 80.0);
        assert_eq!(latency_points(Some(999)), 60.0);
        assert_eq!(latency_points(Some(4_999)), 30.0);
        assert_eq!(latency_points(Some(5_000)), 0.0);
        assert_eq!(latency_points(None), 0.0);
    }

    #[test]
    fn test_ordering_online_beats_slow() {
        let online = composite_score(EndpointStatus::Online, Some(800), 20);
        let slow = composite_score(EndpointStatus::Slow, Some(800), 20);
        assert!(online > slow);
    }
}
