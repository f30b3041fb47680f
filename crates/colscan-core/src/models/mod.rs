//! Data model shared by the scan engine and its collaborators

mod database;
mod rule;
mod scan;
mod view;

pub use database::{ExternalDatabase, TableRef};
pub use rule::ClassificationRule;
pub use scan::{ColumnResult, ScanRecord, ScanStatus};
pub use view::{ColumnView, ScanResultView, SchemaView, TableView};

/// Info type recorded when no rule and no content classification applies
pub const NOT_APPLICABLE: &str = "N/A";
