//! Command handlers

pub mod db;
pub mod migrate;
pub mod results;
pub mod rules;
pub mod scan;

use colscan_core::config::{AppConfig, ConfigValidator};
use colscan_core::storage::MySqlStore;
use std::sync::Arc;

/// Validate the configuration and open the internal store
pub(crate) async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<MySqlStore>> {
    ConfigValidator::validate(config)?;
    let store = MySqlStore::connect(
        &config.storage.connection_url(),
        config.storage.max_connections,
    )
    .await?;
    Ok(Arc::new(store))
}
