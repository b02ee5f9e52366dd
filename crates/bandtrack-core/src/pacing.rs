//! Inter-request pacing against provider quotas.
//!
//! The tracker must leave a fixed gap between successive upstream requests.
//! This is a throttling contract with the data provider, not a performance
//! knob; removing it gets runs rate-limited.

use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Grants at most one permit per delay window. The first acquire passes
/// immediately; later ones wait out the remainder of the window.
pub struct RequestPacer {
    limiter: Option<DirectRateLimiter>,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        let limiter = Quota::with_period(delay).map(RateLimiter::direct);
        Self { limiter }
    }

    /// Waits until the next request is allowed to go upstream.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn spaces_successive_acquisitions_by_the_delay() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let start = Instant::now();

        pacer.acquire().await;
        pacer.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_delay_never_blocks() {
        let pacer = RequestPacer::new(Duration::ZERO);
        let start = Instant::now();

        for _ in 0..10 {
            pacer.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
