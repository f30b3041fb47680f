use anyhow::anyhow;
use colscan_core::catalog::{Catalog, MySqlCatalog};
use colscan_core::config::{AppConfig, ConfigValidator};
use colscan_core::llm::classifier_from_config;
use colscan_core::scan::ScanService;
use colscan_core::storage::DatabaseRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::open_store;
use crate::console::CliConsole;

pub async fn run(
    config: &AppConfig,
    database_id: i64,
    sampling: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    if sampling {
        ConfigValidator::validate_for_sampling(config)?;
    }

    let console = CliConsole::new(verbose);
    let store = open_store(config).await?;
    let database = store
        .get(database_id)
        .await?
        .ok_or_else(|| anyhow!("Database {} is not registered", database_id))?;

    console.info(&format!(
        "Connecting to {}:{} as {}",
        database.host, database.port, database.username
    ));
    let catalog = MySqlCatalog::connect(&database).await?;

    let service = ScanService::new(store.clone(), store.clone(), config.scan.clone());
    let result = if sampling {
        let service = service.with_classifier(classifier_from_config(&config.classifier)?);

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling scan");
                on_interrupt.cancel();
            }
        });

        let catalog: Arc<dyn Catalog> = Arc::new(catalog.clone());
        service
            .execute_scan_with_sampling_and_cancel(database_id, catalog, cancel)
            .await
    } else {
        service.execute_scan(database_id, &catalog).await
    };
    catalog.close().await;

    match result {
        Ok(scan_id) => {
            console.success(&format!("Scan {} finished", scan_id));
            println!("Run `colscan results {}` to see the labels", scan_id);
            Ok(())
        }
        Err(e) => {
            if let Some(scan_id) = e.scan_id() {
                console.error(&format!(
                    "Scan {} failed; results recorded so far are kept",
                    scan_id
                ));
            }
            Err(e.into())
        }
    }
}
