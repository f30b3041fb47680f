use serde::{Deserialize, Serialize};

/// Column entry of a [`TableView`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub column_name: String,
    pub info_type: String,
}

/// Columns grouped under their table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub table_name: String,
    pub columns: Vec<ColumnView>,
}

/// Tables grouped under their schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaView {
    pub schema_name: String,
    pub schema_tables: Vec<TableView>,
}

/// Read-only schema -> table -> column tree derived from stored results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResultView {
    pub database: Vec<SchemaView>,
}

impl ScanResultView {
    pub fn is_empty(&self) -> bool {
        self.database.is_empty()
    }

    /// Total number of columns across all schemas
    pub fn column_count(&self) -> usize {
        self.database
            .iter()
            .flat_map(|s| &s.schema_tables)
            .map(|t| t.columns.len())
            .sum()
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaView> {
        self.database.iter().find(|s| s.schema_name == name)
    }
}

impl SchemaView {
    pub fn table(&self, name: &str) -> Option<&TableView> {
        self.schema_tables.iter().find(|t| t.table_name == name)
    }
}
