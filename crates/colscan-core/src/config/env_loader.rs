//! Environment variable-based configuration loading

use std::str::FromStr;

use super::AppConfig;
use crate::error::{ColscanError, ColscanResult};

/// Apply the process environment on top of `config`
pub fn load_from_env(config: &mut AppConfig) -> ColscanResult<()> {
    apply_env(config, |name| std::env::var(name).ok())
}

/// Apply variables resolved through `lookup` on top of `config`
///
/// Unset and blank variables leave the current value alone; malformed values
/// are configuration errors naming the variable.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> ColscanResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // Scan tuning
    if let Some(v) = parse_var(&get, "SCAN_CONCURRENCY")? {
        config.scan.concurrency = v;
    }
    if let Some(v) = parse_var(&get, "SCAN_TIMEOUT_MS")? {
        config.scan.timeout_ms = v;
    }
    if let Some(v) = parse_var(&get, "SCAN_RATE_LIMIT")? {
        config.scan.rate_limit = v;
    }
    if let Some(v) = parse_var(&get, "SCAN_SAMPLE_LIMIT")? {
        config.scan.sample_limit = v;
    }

    // Classification service
    if let Some(provider) = get("LLM_PROVIDER") {
        config.classifier.provider = provider
            .parse()
            .map_err(|e: String| ColscanError::config_with_context(e, "LLM_PROVIDER"))?;
    }
    if let Some(model) = get("LLM_MODEL") {
        config.classifier.model = model;
    }
    if let Some(key) = get("OPENAI_API_KEY") {
        config.classifier.api_key = Some(key);
    }
    if let Some(url) = get("OPENAI_BASE_URL") {
        config.classifier.base_url = Some(url);
    }

    // Internal store
    if let Some(url) = get("DATABASE_URL") {
        config.storage.url = Some(url);
    }
    if let Some(user) = get("DB_USER") {
        config.storage.user = user;
    }
    if let Some(password) = lookup("DB_PASS") {
        config.storage.password = password;
    }
    if let Some(host) = get("DB_HOST") {
        config.storage.host = host;
    }
    if let Some(v) = parse_var(&get, "DB_PORT")? {
        config.storage.port = v;
    }
    if let Some(name) = get("DB_NAME") {
        config.storage.database = name;
    }
    if let Some(v) = parse_var(&get, "DB_MAX_CONNECTIONS")? {
        config.storage.max_connections = v;
    }

    // Logging
    if let Some(level) = get("LOG_LEVEL") {
        config.logging.level = level.trim().to_ascii_lowercase();
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.logging.format = format
            .parse()
            .map_err(|e: String| ColscanError::config_with_context(e, "LOG_FORMAT"))?;
    }

    Ok(())
}

fn parse_var<T, G>(get: &G, name: &str) -> ColscanResult<Option<T>>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ColscanError::config_with_context(
                format!("Invalid {} value", name),
                format!("Parsing '{}' from {}", raw, name),
            )
        }),
    }
}
