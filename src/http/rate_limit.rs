//! Request pacing
//!
//! LiveAgent enforces a per-key request quota; a run stays under it by
//! drawing one governor token per request.

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Requests per second allowed when nothing is configured.
/// 3/s stays under the 180 requests per minute key quota.
const DEFAULT_RATE: u32 = 3;

/// Pace of the token bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    rate: NonZeroU32,
    burst: NonZeroU32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        let rate = NonZeroU32::MIN.saturating_add(DEFAULT_RATE - 1);
        Self { rate, burst: rate }
    }
}

impl RateLimiterConfig {
    /// `requests_per_second` with an equal burst; `None` for zero, which
    /// means "do not throttle".
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        NonZeroU32::new(requests_per_second).map(|rate| Self { rate, burst: rate })
    }

    /// Allow a different burst; zero keeps the current one
    #[must_use]
    pub fn with_burst(mut self, burst: u32) -> Self {
        if let Some(burst) = NonZeroU32::new(burst) {
            self.burst = burst;
        }
        self
    }

    pub fn requests_per_second(&self) -> u32 {
        self.rate.get()
    }

    pub fn burst(&self) -> u32 {
        self.burst.get()
    }
}

/// Shared token bucket; clones draw from the same bucket
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DefaultDirectRateLimiter>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    pub fn new(config: &RateLimiterConfig) -> Self {
        let quota = Quota::per_second(config.rate).allow_burst(config.burst);
        Self {
            bucket: Arc::new(governor::RateLimiter::direct(quota)),
            config: *config,
        }
    }

    /// Sleep until the next request may go out
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a token if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.config.requests_per_second())
            .field("burst", &self.config.burst())
            .finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_default_matches_key_quota() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.requests_per_second(), 3);
        assert_eq!(config.burst(), 3);
    }

    #[test]
    fn test_zero_means_unthrottled() {
        assert!(RateLimiterConfig::per_second(0).is_none());
    }

    #[test]
    fn test_with_burst() {
        let config = RateLimiterConfig::per_second(2).unwrap().with_burst(10);
        assert_eq!(config.requests_per_second(), 2);
        assert_eq!(config.burst(), 10);
        assert_eq!(config.with_burst(0).burst(), 10);
    }

    #[tokio::test]
    async fn test_bucket_empties_after_burst() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(4).unwrap());
        let clone = limiter.clone();

        assert!(limiter.try_acquire());
        assert!(clone.try_acquire());
        assert!(limiter.try_acquire());
        assert!(clone.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_wait_returns_with_tokens_left() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(50).unwrap());
        limiter.wait().await;
        assert!(format!("{limiter:?}").contains("requests_per_second: 50"));
    }
}
