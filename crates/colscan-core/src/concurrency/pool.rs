//! Bounded worker pool for classification calls
//!
//! Every call goes through the same three gates, in order: a concurrency
//! permit, a rate-limit token, then a deadline. All three waits observe the
//! scan's cancellation token.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::rate_limiter::RateLimiter;
use crate::config::ScanConfig;

/// Configuration for the worker pool
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerPoolConfig {
    /// Maximum calls executing at once
    pub max_concurrency: usize,
    /// Deadline of a single call
    pub call_timeout: Duration,
    /// Call starts per second across the pool, 0 disables
    pub rate_limit: f64,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for WorkerPoolConfig {
    fn from(config: &ScanConfig) -> Self {
        Self {
            max_concurrency: config.concurrency,
            call_timeout: config.call_timeout(),
            rate_limit: config.rate_limit,
        }
    }
}

/// How a pooled call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<T> {
    Completed(T),
    TimedOut(Duration),
    Cancelled,
}

impl<T> TaskOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Pool statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub started: u64,
    pub completed: u64,
    pub timed_out: u64,
    pub cancelled: u64,
    pub peak_in_flight: usize,
}

#[derive(Debug, Default)]
struct StatsCounters {
    started: AtomicU64,
    completed: AtomicU64,
    timed_out: AtomicU64,
    cancelled: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight gauge when a call finishes or is dropped
struct InFlight<'a>(&'a StatsCounters);

impl<'a> InFlight<'a> {
    fn enter(stats: &'a StatsCounters) -> Self {
        stats.started.fetch_add(1, Ordering::SeqCst);
        let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(stats)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Semaphore-bounded, rate-limited executor with per-call deadlines
///
/// Clones share the semaphore, the limiter and the statistics.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: WorkerPoolConfig,
    semaphore: Arc<Semaphore>,
    limiter: RateLimiter,
    stats: Arc<StatsCounters>,
}

impl WorkerPool {
    pub fn new(config: WorkerPoolConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            limiter: RateLimiter::new(config.rate_limit),
            stats: Arc::new(StatsCounters::default()),
            config,
        }
    }

    pub fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    /// Run `task` once a permit and a rate token are available
    ///
    /// The future is not polled at all if the pool is cancelled before it
    /// gets a slot.
    pub async fn execute<F, T>(&self, cancel: &CancellationToken, task: F) -> TaskOutcome<T>
    where
        F: Future<Output = T>,
    {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.cancelled(),
            permit = self.semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return self.cancelled(),
            },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.cancelled(),
            _ = self.limiter.acquire() => {}
        }

        let _in_flight = InFlight::enter(&self.stats);
        let timeout = self.config.call_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => self.cancelled(),
            result = tokio::time::timeout(timeout, task) => match result {
                Ok(value) => {
                    self.stats.completed.fetch_add(1, Ordering::SeqCst);
                    TaskOutcome::Completed(value)
                }
                Err(_) => {
                    self.stats.timed_out.fetch_add(1, Ordering::SeqCst);
                    TaskOutcome::TimedOut(timeout)
                }
            },
        }
    }

    fn cancelled<T>(&self) -> TaskOutcome<T> {
        self.stats.cancelled.fetch_add(1, Ordering::SeqCst);
        TaskOutcome::Cancelled
    }

    /// Calls currently executing
    pub fn in_flight(&self) -> usize {
        self.stats.in_flight.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            started: self.stats.started.load(Ordering::SeqCst),
            completed: self.stats.completed.load(Ordering::SeqCst),
            timed_out: self.stats.timed_out.load(Ordering::SeqCst),
            cancelled: self.stats.cancelled.load(Ordering::SeqCst),
            peak_in_flight: self.stats.peak_in_flight.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tokio::task::JoinSet;
    use tokio::time::Instant;

    fn pool(max_concurrency: usize, timeout_ms: u64, rate_limit: f64) -> WorkerPool {
        WorkerPool::new(WorkerPoolConfig {
            max_concurrency,
            call_timeout: Duration::from_millis(timeout_ms),
            rate_limit,
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_never_exceeds_limit() {
        let pool = pool(3, 5_000, 0.0);
        let cancel = CancellationToken::new();
        let current = Arc::new(AtomicUsize::new(0));
        let observed_max = Arc::new(AtomicUsize::new(0));

        let mut set = JoinSet::new();
        for _ in 0..20 {
            let pool = pool.clone();
            let cancel = cancel.clone();
            let current = current.clone();
            let observed_max = observed_max.clone();
            set.spawn(async move {
                pool.execute(&cancel, async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    observed_max.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            });
        }
        while let Some(outcome) = set.join_next().await {
            assert_eq!(outcome.unwrap(), TaskOutcome::Completed(()));
        }

        assert!(observed_max.load(Ordering::SeqCst) <= 3);
        let stats = pool.stats();
        assert_eq!(stats.started, 20);
        assert_eq!(stats.completed, 20);
        assert!(stats.peak_in_flight <= 3);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let pool = pool(2, 50, 0.0);
        let outcome = pool
            .execute(&CancellationToken::new(), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            })
            .await;
        assert_eq!(outcome, TaskOutcome::TimedOut(Duration::from_millis(50)));
        assert_eq!(pool.stats().timed_out, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_polls_task() {
        let pool = pool(1, 1_000, 0.0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let polled = Arc::new(AtomicBool::new(false));
        let flag = polled.clone();
        let outcome = pool
            .execute(&cancel, async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;

        assert_eq!(outcome, TaskOutcome::Cancelled);
        assert!(!polled.load(Ordering::SeqCst));
        assert_eq!(pool.stats().started, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_running_call() {
        let pool = pool(1, 60_000, 0.0);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = pool
            .execute(&cancel, std::future::pending::<()>())
            .await;
        assert_eq!(outcome, TaskOutcome::Cancelled);
        assert_eq!(pool.stats().cancelled, 1);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_is_shared_across_workers() {
        let pool = pool(4, 1_000, 10.0);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let mut set = JoinSet::new();
        for _ in 0..3 {
            let pool = pool.clone();
            let cancel = cancel.clone();
            set.spawn(async move { pool.execute(&cancel, async { Instant::now() }).await });
        }
        let mut starts = Vec::new();
        while let Some(outcome) = set.join_next().await {
            starts.push(outcome.unwrap().completed().unwrap());
        }
        starts.sort();

        assert!(starts[2].duration_since(start) >= Duration::from_millis(200));
    }
}
