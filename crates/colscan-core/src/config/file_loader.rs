//! File-based configuration loading

use std::fs;
use std::path::Path;

use super::AppConfig;
use crate::error::{ColscanError, ColscanResult};

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "colscan.json";

/// Load configuration from a JSON file
///
/// Returns the default config if the file doesn't exist. Missing sections and
/// fields fall back to their defaults.
pub fn load_from_file(path: &Path) -> ColscanResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ColscanError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ColscanError::config_with_context(
            format!("Failed to parse JSON config: {}", e),
            format!("Deserializing configuration from '{}'", path.display()),
        )
    })
}
