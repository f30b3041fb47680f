use anyhow::anyhow;
use colscan_core::config::AppConfig;
use colscan_core::models::ExternalDatabase;
use colscan_core::storage::DatabaseRegistry;

use super::open_store;
use crate::console::CliConsole;

pub async fn register(
    config: &AppConfig,
    host: String,
    port: u16,
    username: String,
    password: String,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let database = ExternalDatabase::new(host, port, username, password);
    let id = store.register(&database).await?;

    CliConsole::new(false).success(&format!(
        "Registered {}:{} as database {}",
        database.host, database.port, id
    ));
    Ok(())
}

pub async fn show(config: &AppConfig, id: i64) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let database = store
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("Database {} is not registered", id))?;

    println!("{}", serde_json::to_string_pretty(&database)?);
    Ok(())
}
