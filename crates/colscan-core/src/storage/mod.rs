//! Persistence collaborators of the scan engine
//!
//! The engine only sees three narrow traits:
//! - [`RuleStore`]: operator classification rules
//! - [`ScanStore`]: scan history records and per-column results
//! - [`DatabaseRegistry`]: connection details of scannable servers
//!
//! [`InMemoryStore`] backs tests and dry runs; [`MySqlStore`] is the production
//! backend and owns the schema migrations in [`schema`].

mod error;
mod memory;
mod mysql;
pub mod schema;
mod r#trait;

pub use error::DatabaseError;
pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
pub use r#trait::{DatabaseRegistry, RuleStore, ScanStore};
