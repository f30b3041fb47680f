//! Concurrency primitives for the sampling scan

mod pool;
mod rate_limiter;

pub use pool::{PoolStats, TaskOutcome, WorkerPool, WorkerPoolConfig};
pub use rate_limiter::RateLimiter;
