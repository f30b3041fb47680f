//! Command routing logic for CLI

use colscan_core::config::AppConfig;

use crate::args::{Cli, Commands, DbAction, RulesAction};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await,
        Commands::Db { action } => match action {
            DbAction::Register {
                host,
                port,
                username,
                password,
            } => commands::db::register(&config, host, port, username, password).await,
            DbAction::Show { id } => commands::db::show(&config, id).await,
        },
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(&config).await,
            RulesAction::Add { type_name, pattern } => {
                commands::rules::add(&config, &type_name, &pattern).await
            }
        },
        Commands::Scan {
            database_id,
            sampling,
        } => commands::scan::run(&config, database_id, sampling, cli.verbose).await,
        Commands::Results { scan_id, json } => commands::results::results(&config, scan_id, json).await,
        Commands::Summary { scan_id, json } => commands::results::summary(&config, scan_id, json).await,
        Commands::Status { scan_id } => commands::results::status(&config, scan_id).await,
    }
}
