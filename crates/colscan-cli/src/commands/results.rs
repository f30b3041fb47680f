use colored::*;
use colscan_core::config::AppConfig;
use colscan_core::models::{NOT_APPLICABLE, ScanStatus};
use colscan_core::scan::ScanService;

use super::open_store;
use crate::console::CliConsole;

async fn service(config: &AppConfig) -> anyhow::Result<ScanService> {
    let store = open_store(config).await?;
    Ok(ScanService::new(store.clone(), store, config.scan.clone()))
}

fn colored_status(status: ScanStatus) -> ColoredString {
    match status {
        ScanStatus::Success => status.as_str().green().bold(),
        ScanStatus::Failed => status.as_str().red().bold(),
        ScanStatus::Running => status.as_str().yellow().bold(),
    }
}

fn colored_label(label: &str) -> ColoredString {
    if label == NOT_APPLICABLE {
        label.dimmed()
    } else {
        label.yellow()
    }
}

pub async fn results(config: &AppConfig, scan_id: i64, json: bool) -> anyhow::Result<()> {
    let view = service(config).await?.get_scan_results(scan_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if view.is_empty() {
        CliConsole::new(false).warn(&format!("Scan {} recorded no columns", scan_id));
        return Ok(());
    }

    for schema in &view.database {
        println!("{}", schema.schema_name.bold());
        for table in &schema.schema_tables {
            println!("  {}", table.table_name.cyan());
            for column in &table.columns {
                println!("    {:<32} {}", column.column_name, colored_label(&column.info_type));
            }
        }
    }
    Ok(())
}

pub async fn summary(config: &AppConfig, scan_id: i64, json: bool) -> anyhow::Result<()> {
    let summary = service(config).await?.get_scan_summary(scan_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let console = CliConsole::new(false);
    console.print_header(&format!("Scan {}", summary.scan_id));
    println!("  status:    {}", colored_status(summary.status));
    println!("  database:  {}", summary.database_id);
    println!("  started:   {}", summary.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  columns:   {} ({} sensitive, {:.1}%)",
        summary.total_columns,
        summary.sensitive_columns,
        summary.sensitive_percentage()
    );

    console.print_header("By info type");
    for entry in &summary.by_info_type {
        println!(
            "  {:<22} {:>6} {:>6.1}%",
            colored_label(&entry.info_type),
            entry.count,
            summary.percentage(&entry.info_type)
        );
    }

    console.print_header("By table");
    for table in &summary.tables {
        println!(
            "  {}.{:<28} {:>4} columns, {:>4} sensitive",
            table.schema_name, table.table_name, table.total_columns, table.sensitive_columns
        );
    }
    Ok(())
}

pub async fn status(config: &AppConfig, scan_id: i64) -> anyhow::Result<()> {
    let record = service(config).await?.get_scan(scan_id).await?;
    println!(
        "Scan {} on database {}: {} (started {})",
        record.id,
        record.database_id,
        colored_status(record.status),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
