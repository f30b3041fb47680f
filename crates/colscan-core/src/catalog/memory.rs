//! In-memory catalog for tests and dry runs

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Catalog, is_system_schema};
use crate::models::TableRef;
use crate::storage::DatabaseError;

#[derive(Debug, Clone)]
struct MemoryColumn {
    name: String,
    values: Vec<Option<String>>,
    projectable: bool,
}

#[derive(Debug, Clone)]
struct MemoryTable {
    table: TableRef,
    is_view: bool,
    columns: Vec<MemoryColumn>,
}

/// Catalog assembled in code
///
/// Columns keep the order they were declared in, which stands in for their
/// ordinal position. Filtering mirrors a real server: views and system
/// schemas are never listed, samples are distinct and non-null.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: Vec<MemoryTable>,
    unreachable: Option<String>,
    sample_queries: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base table with the given columns
    pub fn table(mut self, schema: &str, table: &str, columns: &[&str]) -> Self {
        self.push_table(schema, table, columns, false);
        self
    }

    /// Add a view; views are never listed
    pub fn view(mut self, schema: &str, table: &str, columns: &[&str]) -> Self {
        self.push_table(schema, table, columns, true);
        self
    }

    /// Set the stored values of a column, creating the table or column if needed
    pub fn values(mut self, schema: &str, table: &str, column: &str, values: &[Option<&str>]) -> Self {
        let col = self.column_mut(schema, table, column);
        col.values = values.iter().map(|v| v.map(str::to_string)).collect();
        self
    }

    /// Make sampling `column` fail, like a BLOB the server cannot cast
    pub fn unprojectable(mut self, schema: &str, table: &str, column: &str) -> Self {
        self.column_mut(schema, table, column).projectable = false;
        self
    }

    /// Make every metadata query fail with a connection error
    pub fn unreachable(mut self, reason: &str) -> Self {
        self.unreachable = Some(reason.to_string());
        self
    }

    /// Number of sampling queries served so far
    pub fn sample_queries(&self) -> usize {
        self.sample_queries.load(Ordering::SeqCst)
    }

    fn push_table(&mut self, schema: &str, table: &str, columns: &[&str], is_view: bool) {
        self.tables.push(MemoryTable {
            table: TableRef::new(schema, table),
            is_view,
            columns: columns
                .iter()
                .map(|name| MemoryColumn {
                    name: name.to_string(),
                    values: Vec::new(),
                    projectable: true,
                })
                .collect(),
        });
    }

    fn column_mut(&mut self, schema: &str, table: &str, column: &str) -> &mut MemoryColumn {
        let key = TableRef::new(schema, table);
        let idx = match self.tables.iter().position(|t| t.table == key) {
            Some(idx) => idx,
            None => {
                self.push_table(schema, table, &[], false);
                self.tables.len() - 1
            }
        };
        let columns = &mut self.tables[idx].columns;
        let pos = match columns.iter().position(|c| c.name == column) {
            Some(pos) => pos,
            None => {
                columns.push(MemoryColumn {
                    name: column.to_string(),
                    values: Vec::new(),
                    projectable: true,
                });
                columns.len() - 1
            }
        };
        &mut columns[pos]
    }

    fn check_reachable(&self) -> Result<(), DatabaseError> {
        match &self.unreachable {
            Some(reason) => Err(DatabaseError::Connection(reason.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, table: &TableRef) -> Option<&MemoryTable> {
        self.tables.iter().find(|t| &t.table == table)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn list_tables(&self) -> Result<Vec<TableRef>, DatabaseError> {
        self.check_reachable()?;
        let mut tables: Vec<TableRef> = self
            .tables
            .iter()
            .filter(|t| !t.is_view && !is_system_schema(&t.table.schema))
            .map(|t| t.table.clone())
            .collect();
        tables.sort();
        Ok(tables)
    }

    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, DatabaseError> {
        self.check_reachable()?;
        Ok(self
            .find(table)
            .map(|t| t.columns.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default())
    }

    async fn sample_column(
        &self,
        table: &TableRef,
        column: &str,
        limit: usize,
    ) -> Result<Vec<String>, DatabaseError> {
        self.check_reachable()?;
        self.sample_queries.fetch_add(1, Ordering::SeqCst);

        let col = self
            .find(table)
            .and_then(|t| t.columns.iter().find(|c| c.name == column))
            .ok_or_else(|| DatabaseError::Query(format!("unknown column {}.{}", table, column)))?;
        if !col.projectable {
            return Err(DatabaseError::Query(format!(
                "column {}.{} cannot be projected",
                table, column
            )));
        }

        let mut samples: Vec<String> = Vec::new();
        for value in col.values.iter().flatten() {
            if samples.len() == limit {
                break;
            }
            if !samples.contains(value) {
                samples.push(value.clone());
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .table("shop", "orders", &["id", "total"])
            .table("mysql", "user", &["User", "Host"])
            .view("shop", "order_totals", &["total"])
            .table("crm", "contacts", &["zip", "email", "age"])
    }

    #[tokio::test]
    async fn test_lists_base_tables_outside_system_schemas() {
        let tables = shop().list_tables().await.unwrap();
        assert_eq!(
            tables,
            vec![TableRef::new("crm", "contacts"), TableRef::new("shop", "orders")]
        );
    }

    #[tokio::test]
    async fn test_columns_keep_declared_order() {
        let cols = shop()
            .list_columns(&TableRef::new("crm", "contacts"))
            .await
            .unwrap();
        assert_eq!(cols, vec!["zip", "email", "age"]);
    }

    #[tokio::test]
    async fn test_samples_are_distinct_non_null_and_bounded() {
        let catalog = shop().values(
            "crm",
            "contacts",
            "email",
            &[Some("a@x.io"), None, Some("a@x.io"), Some("b@x.io"), Some("c@x.io")],
        );
        let table = TableRef::new("crm", "contacts");

        let samples = catalog.sample_column(&table, "email", 2).await.unwrap();
        assert_eq!(samples, vec!["a@x.io", "b@x.io"]);

        let samples = catalog.sample_column(&table, "email", 10).await.unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(catalog.sample_queries(), 2);
    }

    #[tokio::test]
    async fn test_unprojectable_and_unreachable() {
        let catalog = shop().unprojectable("shop", "orders", "total");
        assert!(
            catalog
                .sample_column(&TableRef::new("shop", "orders"), "total", 5)
                .await
                .is_err()
        );

        let down = shop().unreachable("connection refused");
        assert!(matches!(
            down.list_tables().await,
            Err(DatabaseError::Connection(_))
        ));
    }
}
