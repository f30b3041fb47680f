//! Colscan CLI application
//!
//! Operator surface over the scan engine:
//!
//! ```bash
//! colscan migrate                              # create internal tables
//! colscan db register --host db1 --user audit  # register a server to scan
//! colscan rules add EMAIL_ADDRESS '(?i)e-?mail'
//! colscan scan 1 --sampling                    # scan registered server 1
//! colscan results 7 --json                     # schema -> table -> column labels
//! colscan summary 7                            # counts per info type and table
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;
use colscan_core::config;

pub use args::{Cli, Commands, DbAction, RulesAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(Some(cli.config_file.as_path()))?;
    cli.apply_overrides(&mut config);

    // RUST_LOG still takes precedence over the configured level
    logging::init(&config.logging, cli.verbose);
    tracing::debug!(config_file = %cli.config_file.display(), "configuration loaded");

    router::route(cli, config).await
}
