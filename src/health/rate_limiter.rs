// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-URL rate limiting for health probes

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

use super::types::ProbeError;

/// Admits at most `max_requests` probes per URL in each window
///
/// A denied check fails immediately; callers are expected to fall back to a
/// cached result rather than wait.
pub struct ProbeRateLimiter {
    limiter: GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
    max_requests: u32,
    window: Duration,
}

impl ProbeRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `max_requests` - Probes allowed per URL within `window` (0 becomes 1)
    /// * `window` - Length of the replenishment window
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
        let period = (window / burst.get()).max(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        Self {
            limiter: GovRateLimiter::keyed(quota),
            max_requests: burst.get(),
            window,
        }
    }

    /// Check whether a probe of `url` is allowed right now
    pub fn check(&self, url: &str) -> Result<(), ProbeError> {
        self.limiter
            .check_key(&url.trim().to_string())
            .map_err(|_| ProbeError::RateLimited {
                url: url.to_string(),
            })
    }

    /// Drop state for URLs whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = ProbeRateLimiter::new(10, Duration::from_secs(60));
        assert_eq!(limiter.max_requests(), 10);
        assert_eq!(limiter.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_rate_limiter_denies_after_burst() {
        let limiter = ProbeRateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check("https://a").is_ok());
        assert!(limiter.check("https://a").is_ok());
        assert!(matches!(
            limiter.check("https://a"),
            Err(ProbeError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_rate_limiter_keys_are_independent() {
        let limiter = ProbeRateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("https://a").is_ok());
        assert!(limiter.check("https://a").is_err());
        assert!(limiter.check("https://b").is_ok());
    }

    #[test]
    fn test_rate_limiter_zero_becomes_one() {
        let limiter = ProbeRateLimiter::new(0, Duration::from_secs(60));
        assert_eq!(limiter.max_requests(), 1);
        assert!(limiter.check("https://a").is_ok());
    }
}
