//! Configuration validation

use super::AppConfig;
use crate::error::{ColscanError, ColscanResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate everything a name-only scan needs
    pub fn validate(config: &AppConfig) -> ColscanResult<()> {
        Self::validate_scan(config)?;
        Self::validate_storage(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    /// Additionally require a usable classification service
    pub fn validate_for_sampling(config: &AppConfig) -> ColscanResult<()> {
        Self::validate(config)?;
        Self::validate_classifier(config)
    }

    fn validate_scan(config: &AppConfig) -> ColscanResult<()> {
        let scan = &config.scan;
        if scan.concurrency == 0 {
            return Err(ColscanError::config("Scan concurrency must be greater than 0"));
        }
        if scan.timeout_ms == 0 {
            return Err(ColscanError::config("Scan timeout must be greater than 0 ms"));
        }
        if !scan.rate_limit.is_finite() || scan.rate_limit < 0.0 {
            return Err(ColscanError::config(format!(
                "Scan rate limit must be a finite number >= 0, got {}",
                scan.rate_limit
            )));
        }
        if scan.sample_limit == 0 {
            return Err(ColscanError::config("Sample limit must be greater than 0"));
        }
        Ok(())
    }

    fn validate_classifier(config: &AppConfig) -> ColscanResult<()> {
        let classifier = &config.classifier;
        if classifier.model.trim().is_empty() {
            return Err(ColscanError::config("Classifier model must not be empty"));
        }
        if classifier.provider.requires_api_key() && !classifier.has_api_key() {
            return Err(ColscanError::config_with_context(
                format!("Provider '{}' requires an API key", classifier.provider),
                "Set OPENAI_API_KEY",
            ));
        }
        if classifier.max_tokens == 0 {
            return Err(ColscanError::config("Classifier max_tokens must be greater than 0"));
        }
        Ok(())
    }

    fn validate_storage(config: &AppConfig) -> ColscanResult<()> {
        if config.storage.max_connections == 0 {
            return Err(ColscanError::config(
                "Storage max_connections must be greater than 0",
            ));
        }
        Ok(())
    }

    fn validate_logging(config: &AppConfig) -> ColscanResult<()> {
        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ColscanError::config(format!(
                "Unknown log level '{}'. Valid levels are: {:?}",
                config.logging.level, LOG_LEVELS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;

    #[test]
    fn test_defaults_are_valid_for_name_scans() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_limits() {
        let mut config = AppConfig::default();
        config.scan.concurrency = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.scan.timeout_ms = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.scan.rate_limit = -1.0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.scan.rate_limit = f64::NAN;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_sampling_requires_key_for_openai_only() {
        let mut config = AppConfig::default();
        assert!(ConfigValidator::validate_for_sampling(&config).is_err());

        config.classifier.api_key = Some("sk-test".to_string());
        assert!(ConfigValidator::validate_for_sampling(&config).is_ok());

        config.classifier.api_key = None;
        config.classifier.provider = LlmProvider::Ollama;
        assert!(ConfigValidator::validate_for_sampling(&config).is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
