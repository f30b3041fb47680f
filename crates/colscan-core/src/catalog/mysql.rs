//! Catalog over a live MySQL server's `information_schema`

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use super::{Catalog, SYSTEM_SCHEMAS};
use crate::models::{ExternalDatabase, TableRef};
use crate::storage::DatabaseError;

/// Catalog backed by a small sqlx pool on the target server
#[derive(Debug, Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Connect to a registered server's `information_schema`
    pub async fn connect(database: &ExternalDatabase) -> Result<Self, DatabaseError> {
        let options = MySqlConnectOptions::new()
            .host(&database.host)
            .port(database.port)
            .username(&database.username)
            .password(&database.password)
            .database("information_schema");

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!(
                    "{}:{}: {}",
                    database.host, database.port, e
                ))
            })?;

        tracing::debug!(host = %database.host, port = database.port, "catalog connected");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

fn tables_query() -> String {
    let excluded = SYSTEM_SCHEMAS
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "SELECT CAST(TABLE_SCHEMA AS CHAR), CAST(TABLE_NAME AS CHAR) \
         FROM information_schema.tables \
         WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_SCHEMA NOT IN ({}) \
         ORDER BY TABLE_SCHEMA, TABLE_NAME",
        excluded
    )
}

fn sample_query(table: &TableRef, column: &str) -> String {
    let col = quote_identifier(column);
    format!(
        "SELECT DISTINCT CAST({col} AS CHAR) FROM {}.{} WHERE {col} IS NOT NULL LIMIT ?",
        quote_identifier(&table.schema),
        quote_identifier(&table.table),
    )
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn list_tables(&self) -> Result<Vec<TableRef>, DatabaseError> {
        let rows: Vec<(String, String)> = sqlx::query_as(&tables_query())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(schema, table)| TableRef::new(schema, table))
            .collect())
    }

    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT CAST(COLUMN_NAME AS CHAR) FROM information_schema.columns \
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? ORDER BY ORDINAL_POSITION",
        )
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn sample_column(
        &self,
        table: &TableRef,
        column: &str,
        limit: usize,
    ) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(Option<String>,)> = sqlx::query_as(&sample_query(table, column))
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().filter_map(|(value,)| value).collect())
    }
}
