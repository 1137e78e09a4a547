//! Reactive rate limiting for the dbt Cloud API
//!
//! Requests are unthrottled until the API answers with 429. From then on
//! every request waits for the limiter. The rejected request itself is not
//! retried.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Requests per second once throttling is active
pub const THROTTLED_REQUESTS_PER_SECOND: u32 = 5;

/// Rate limiter that stays dormant until the first 429.
pub struct ReactiveRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
}

impl Default for ReactiveRateLimiter {
    fn default() -> Self {
        Self::new(THROTTLED_REQUESTS_PER_SECOND)
    }
}

impl ReactiveRateLimiter {
    /// Create a limiter allowing `per_second` requests once activated.
    pub fn new(per_second: u32) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: RateLimiter::direct(quota),
            active: AtomicBool::new(false),
        }
    }

    /// Switch throttling on (called on 429).
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated");
        }
    }

    /// Check if throttling is on.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for permission if throttling is on.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            self.limiter.until_ready().await;
        }
    }
}
