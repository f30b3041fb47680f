use colscan_core::config::AppConfig;

use super::open_store;
use crate::console::CliConsole;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let applied = store.migrate().await?;

    let console = CliConsole::new(false);
    if applied == 0 {
        console.success("Schema is up to date");
    } else {
        console.success(&format!("Applied {} migration(s)", applied));
    }
    store.close().await;
    Ok(())
}
