//! Token bucket rate limiter
//!
//! Spaces the *start* of classification calls across every worker of a scan.
//! The bucket holds at most one token, so two starts are never closer than
//! `1 / requests_per_second` apart.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Shared rate limiter; clones draw from the same bucket
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests_per_second: f64,
    bucket: Option<Arc<Mutex<Bucket>>>,
}

impl RateLimiter {
    /// Create a limiter; a non-positive or non-finite rate disables it
    pub fn new(requests_per_second: f64) -> Self {
        let enabled = requests_per_second.is_finite() && requests_per_second > 0.0;
        Self {
            requests_per_second,
            bucket: enabled.then(|| {
                Arc::new(Mutex::new(Bucket {
                    tokens: 1.0,
                    last_refill: Instant::now(),
                }))
            }),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0.0)
    }

    pub fn is_enabled(&self) -> bool {
        self.bucket.is_some()
    }

    pub fn requests_per_second(&self) -> f64 {
        self.requests_per_second
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.requests_per_second).min(1.0);
        bucket.last_refill = now;
    }

    /// Take a token without waiting
    pub async fn try_acquire(&self) -> bool {
        let Some(bucket) = &self.bucket else {
            return true;
        };
        let mut bucket = bucket.lock().await;
        self.refill(&mut bucket);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Take a token, waiting for the bucket to refill if necessary
    pub async fn acquire(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        loop {
            let wait = {
                let mut bucket = bucket.lock().await;
                self.refill(&mut bucket);
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                // Tiny rates overflow `Duration`; sleep() clamps MAX to a far deadline.
                Duration::try_from_secs_f64((1.0 - bucket.tokens) / self.requests_per_second)
                    .unwrap_or(Duration::MAX)
            };
            tracing::trace!(
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "waiting for rate limit token"
            );
            sleep(wait).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready};

    #[tokio::test]
    async fn test_disabled_limiter_never_waits() {
        for rate in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let limiter = RateLimiter::new(rate);
            assert!(!limiter.is_enabled());
            for _ in 0..100 {
                assert!(limiter.try_acquire().await);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_acquire_empties_bucket() {
        let limiter = RateLimiter::new(10.0);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_spaces_call_starts() {
        let limiter = RateLimiter::new(10.0);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_pends_until_refill() {
        let limiter = RateLimiter::new(10.0);
        limiter.acquire().await;

        let mut waiting = tokio_test::task::spawn(limiter.acquire());
        assert_pending!(waiting.poll());

        tokio::time::advance(Duration::from_millis(150)).await;
        assert_ready!(waiting.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiny_rate_waits_instead_of_panicking() {
        let limiter = RateLimiter::new(1e-20);
        assert!(limiter.is_enabled());
        limiter.acquire().await;

        let mut waiting = tokio_test::task::spawn(limiter.acquire());
        assert_pending!(waiting.poll());

        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert_pending!(waiting.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_bucket() {
        let limiter = RateLimiter::new(1.0);
        let clone = limiter.clone();
        assert!(limiter.try_acquire().await);
        assert!(!clone.try_acquire().await);
    }
}
