//! Configuration management
//!
//! Layers, lowest to highest precedence: defaults, `colscan.json`, `.env` and
//! the process environment, then whatever the caller overrides (CLI flags).

mod app_config;
mod classifier_config;
mod env_loader;
mod file_loader;
mod logging_config;
mod scan_config;
mod storage_config;
pub mod validation;

pub use app_config::AppConfig;
pub use classifier_config::{ClassifierConfig, LlmProvider};
pub use env_loader::{apply_env, load_from_env};
pub use file_loader::{DEFAULT_CONFIG_FILE, load_from_file};
pub use logging_config::{LogFormat, LoggingConfig};
pub use scan_config::ScanConfig;
pub use storage_config::StorageConfig;
pub use validation::ConfigValidator;

use std::path::Path;

use crate::error::ColscanResult;

/// Load configuration from an optional file, `.env` and the environment
///
/// Validation is left to the caller, which knows whether sampling is needed.
pub fn load_config(path: Option<&Path>) -> ColscanResult<AppConfig> {
    let mut config = load_from_file(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)))?;

    if let Ok(dotenv_path) = dotenv::dotenv() {
        tracing::debug!(path = %dotenv_path.display(), "loaded .env");
    }
    load_from_env(&mut config)?;

    Ok(config)
}
