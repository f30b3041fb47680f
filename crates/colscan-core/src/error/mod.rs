//! Error types for colscan
//!
//! Every fallible engine operation returns [`ColscanResult`]. Errors fall into the
//! three groups the scan orchestrator cares about:
//! - fatal setup errors (configuration, rules, catalog) abort a scan before work runs
//! - recoverable per-column errors (classifier, timeout) degrade one column to `N/A`
//! - persistence errors, which are fatal because the output channel is gone

mod constructors;
mod conversions;
mod types;

pub use types::{ColscanError, ColscanResult};
