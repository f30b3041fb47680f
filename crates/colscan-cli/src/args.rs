//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use colscan_core::config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "colscan")]
#[command(about = "Locate sensitive columns in MySQL servers")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Maximum concurrent classification calls
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-call classification timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Classification calls per second (0 disables throttling)
    #[arg(long, global = true)]
    pub rate_limit: Option<f64>,

    /// Distinct values sampled per column
    #[arg(long, global = true)]
    pub sample_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line flags on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(concurrency) = self.concurrency {
            config.scan.concurrency = concurrency;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.scan.timeout_ms = timeout_ms;
        }
        if let Some(rate_limit) = self.rate_limit {
            config.scan.rate_limit = rate_limit;
        }
        if let Some(sample_limit) = self.sample_limit {
            config.scan.sample_limit = sample_limit;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or upgrade the internal tables
    Migrate,

    /// Manage registered database servers
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Manage classification rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Scan a registered database server
    Scan {
        /// Id of the registered server
        database_id: i64,

        /// Classify columns without a rule match from sampled values
        #[arg(long)]
        sampling: bool,
    },

    /// Show the labels recorded by a scan
    Results {
        scan_id: i64,

        /// Print the grouped results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-type and per-table counts of a scan
    Summary {
        scan_id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Show the status of a scan
    Status { scan_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum DbAction {
    /// Register a server and print its id
    Register {
        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = 3306)]
        port: u16,

        #[arg(long = "user")]
        username: String,

        #[arg(long, env = "COLSCAN_TARGET_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
    },

    /// Show a registered server
    Show { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// List rules in evaluation order
    List,

    /// Add a rule; the pattern is compiled before it is stored
    Add { type_name: String, pattern: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_command_parsing() {
        let cli = Cli::try_parse_from(["colscan", "scan", "3", "--sampling", "--concurrency", "8"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Scan {
                database_id: 3,
                sampling: true
            }
        ));
        assert_eq!(cli.concurrency, Some(8));
        assert_eq!(cli.config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_overrides_apply_only_when_given() {
        let cli = Cli::try_parse_from(["colscan", "--timeout-ms", "2500", "status", "1"]).unwrap();
        let mut config = AppConfig::default();
        config.scan.concurrency = 6;
        cli.apply_overrides(&mut config);

        assert_eq!(config.scan.timeout_ms, 2500);
        assert_eq!(config.scan.concurrency, 6);
    }

    #[test]
    fn test_rules_add_parsing() {
        let cli = Cli::try_parse_from(["colscan", "rules", "add", "SSN", "(?i)^ssn$"]).unwrap();
        match cli.command {
            Commands::Rules {
                action: RulesAction::Add { type_name, pattern },
            } => {
                assert_eq!(type_name, "SSN");
                assert_eq!(pattern, "(?i)^ssn$");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_db_register_requires_host() {
        assert!(Cli::try_parse_from(["colscan", "db", "register", "--user", "audit"]).is_err());
    }
}
