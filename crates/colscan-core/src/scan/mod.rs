//! Scan orchestrator and the read-side views of its results

mod service;
pub mod summary;
pub mod view;


pub use service::ScanService;
pub use summary::{InfoTypeCount, ScanSummary, TableSummary};
pub use view::{UNKNOWN_SCHEMA, group_results};
