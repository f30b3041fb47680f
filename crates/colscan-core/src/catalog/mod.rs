//! Metadata catalog of a scanned server
//!
//! [`Catalog`] is the read-only view the scan engine needs: base tables outside
//! the system schemas, the columns of a table in ordinal order, and a bounded
//! sample of distinct non-null values for a column.

mod memory;
mod mysql;
pub mod sampler;
mod walker;

pub use memory::InMemoryCatalog;
pub use mysql::MySqlCatalog;
pub use sampler::Sampler;
pub use walker::{TableColumns, walk};

use async_trait::async_trait;

use crate::models::TableRef;
use crate::storage::DatabaseError;

/// Schemas owned by the server itself, never scanned
pub const SYSTEM_SCHEMAS: [&str; 4] = ["mysql", "sys", "information_schema", "performance_schema"];

pub fn is_system_schema(schema: &str) -> bool {
    SYSTEM_SCHEMAS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(schema))
}

/// Read-only metadata source
///
/// Implementations are used sequentially by one scan; they need not support
/// concurrent queries, but must be shareable across tasks.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Base tables of every user schema, ordered by (schema, table)
    async fn list_tables(&self) -> Result<Vec<TableRef>, DatabaseError>;

    /// Column names of `table` in declared ordinal order
    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, DatabaseError>;

    /// At most `limit` distinct, non-null values of `column`
    async fn sample_column(
        &self,
        table: &TableRef,
        column: &str,
        limit: usize,
    ) -> Result<Vec<String>, DatabaseError>;
}
