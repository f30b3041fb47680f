//! Colscan - locate sensitive columns in relational databases
//!
//! Convenience facade over `colscan-core`. A scan walks every base table of a
//! registered server, labels each column by operator rules on its name, and
//! optionally sends sampled values to a content classifier when no rule
//! matches.
//!
//! ```no_run
//! use colscan::{InMemoryCatalog, InMemoryStore, ScanConfig, ScanService};
//! use std::sync::Arc;
//!
//! # async fn run() -> colscan::ColscanResult<()> {
//! let store = InMemoryStore::new();
//! let service = ScanService::new(Arc::new(store.clone()), Arc::new(store), ScanConfig::default());
//! let catalog = InMemoryCatalog::new().table("shop", "users", &["username", "email"]);
//! let scan_id = service.execute_scan(1, &catalog).await?;
//! println!("{:?}", service.get_scan_results(scan_id).await?);
//! # Ok(())
//! # }
//! ```

pub use colscan_core::*;
