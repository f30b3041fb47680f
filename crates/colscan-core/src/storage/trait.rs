//! Store trait definitions

use async_trait::async_trait;

use super::error::DatabaseError;
use crate::models::{ClassificationRule, ColumnResult, ExternalDatabase, ScanRecord, ScanStatus};

/// Source of classification rules
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// All rules in creation order
    async fn get_all_rules(&self) -> Result<Vec<ClassificationRule>, DatabaseError>;

    /// Persist a new rule and return its id
    async fn create_rule(&self, type_name: &str, pattern: &str) -> Result<i64, DatabaseError>;
}

/// Scan history and results
///
/// Implementations must accept concurrent `save_result` calls from several
/// workers of the same scan.
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Create a scan record in `running` state and return its id
    async fn create_history(&self, database_id: i64) -> Result<i64, DatabaseError>;

    async fn update_status(&self, scan_id: i64, status: ScanStatus) -> Result<(), DatabaseError>;

    /// Append one column result
    async fn save_result(&self, result: &ColumnResult) -> Result<(), DatabaseError>;

    /// Results of one scan ordered by (schema, table, column)
    async fn get_results_by_scan_id(&self, scan_id: i64)
    -> Result<Vec<ColumnResult>, DatabaseError>;

    async fn get_history(&self, scan_id: i64) -> Result<Option<ScanRecord>, DatabaseError>;
}

/// Registered database servers
#[async_trait]
pub trait DatabaseRegistry: Send + Sync {
    async fn register(&self, database: &ExternalDatabase) -> Result<i64, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<ExternalDatabase>, DatabaseError>;
}
