//! Schema walker

use tracing::{debug, info};

use super::Catalog;
use crate::error::{ColscanError, ColscanResult};
use crate::models::TableRef;

/// A base table with its columns in ordinal order
pub type TableColumns = (TableRef, Vec<String>);

/// Enumerate every user table and its columns in one sequential pass
///
/// Any catalog failure aborts the walk; nothing is returned for a partially
/// enumerated server.
pub async fn walk(catalog: &dyn Catalog) -> ColscanResult<Vec<TableColumns>> {
    let tables = catalog
        .list_tables()
        .await
        .map_err(|e| ColscanError::catalog_with_context(e.to_string(), "listing tables"))?;
    debug!(tables = tables.len(), "listed base tables");

    let mut walked = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = catalog.list_columns(&table).await.map_err(|e| {
            ColscanError::catalog_with_context(e.to_string(), format!("listing columns of {}", table))
        })?;
        info!(table = %table, columns = columns.len(), "enumerated table");
        walked.push((table, columns));
    }
    Ok(walked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    #[tokio::test]
    async fn test_walk_preserves_table_and_ordinal_order() {
        let catalog = InMemoryCatalog::new()
            .table("shop", "orders", &["id", "customer_email"])
            .table("crm", "people", &["surname", "first_name"]);

        let walked = walk(&catalog).await.unwrap();
        assert_eq!(walked.len(), 2);
        assert_eq!(walked[0].0, TableRef::new("crm", "people"));
        assert_eq!(walked[0].1, vec!["surname", "first_name"]);
        assert_eq!(walked[1].1, vec!["id", "customer_email"]);
    }

    #[tokio::test]
    async fn test_walk_failure_is_catalog_error() {
        let catalog = InMemoryCatalog::new()
            .table("shop", "orders", &["id"])
            .unreachable("access denied");
        let err = walk(&catalog).await.unwrap_err();
        assert!(matches!(err, ColscanError::Catalog { .. }));
        assert!(!err.is_recoverable());
    }
}
