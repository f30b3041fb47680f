use colored::*;
use colscan_core::config::AppConfig;
use colscan_core::rules;
use colscan_core::storage::RuleStore;

use super::open_store;
use crate::console::CliConsole;

pub async fn list(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let rules = store.get_all_rules().await?;

    let console = CliConsole::new(false);
    if rules.is_empty() {
        console.warn("No rules defined; sampling scans will use the default categories");
        return Ok(());
    }

    console.print_header("Classification rules (first match wins)");
    for rule in rules {
        println!(
            "{:>4}  {:<22} {}",
            rule.id.to_string().dimmed(),
            rule.type_name.cyan(),
            rule.pattern
        );
    }
    Ok(())
}

pub async fn add(config: &AppConfig, type_name: &str, pattern: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let rule = rules::create_rule(store.as_ref(), type_name, pattern).await?;

    CliConsole::new(false).success(&format!("Created rule {} ({})", rule.id, rule.type_name));
    Ok(())
}
