//! Scan tuning

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Concurrency, rate and sampling limits for a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum in-flight classification calls
    pub concurrency: usize,
    /// Per-call deadline in milliseconds
    pub timeout_ms: u64,
    /// Classification call starts per second, 0 disables throttling
    pub rate_limit: f64,
    /// Distinct values sampled per column
    pub sample_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout_ms: 8000,
            rate_limit: 0.0,
            sample_limit: 5,
        }
    }
}

impl ScanConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: f64) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }
}
