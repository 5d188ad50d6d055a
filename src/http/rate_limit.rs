//! Client-side request pacing
//!
//! LearnUpon enforces a per-portal request quota, so a run can opt into
//! pacing its page fetches with a governor token bucket.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Shared token bucket refilled at a fixed rate per second
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<DirectLimiter>,
    requests_per_second: NonZeroU32,
}

impl Throttle {
    /// Allow `requests_per_second` requests, bursting up to one second's worth.
    ///
    /// A rate of `0` is treated as `1`.
    pub fn per_second(requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
            requests_per_second: rate,
        }
    }

    /// Effective rate
    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second.get()
    }

    /// Wait for a permit
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("requests_per_second", &self.requests_per_second)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod throttle_tests {
    use super::*;

    #[test]
    fn test_zero_rate_falls_back_to_one() {
        let throttle = Throttle::per_second(0);
        assert_eq!(throttle.requests_per_second(), 1);
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_burst_is_one_second_of_requests() {
        let throttle = Throttle::per_second(5);
        for _ in 0..5 {
            assert!(throttle.try_acquire());
        }
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_clones_share_the_bucket() {
        let throttle = Throttle::per_second(1);
        let clone = throttle.clone();
        assert!(throttle.try_acquire());
        assert!(!clone.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_within_burst() {
        let throttle = Throttle::per_second(100);
        throttle.acquire().await;
        throttle.acquire().await;
    }
}
