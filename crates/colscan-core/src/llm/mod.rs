//! Content classification gateway
//!
//! When a column name matches no rule, a handful of its values are sent to an
//! external language model which must answer with exactly one label from a
//! closed set. [`ContentClassifier`] is the seam the scan engine depends on;
//! [`OpenAiClassifier`] talks to any OpenAI-compatible chat endpoint.

pub mod normalize;
mod openai;
pub mod prompt;

pub use normalize::{LABEL_FALLBACKS, normalize_label};
pub use openai::OpenAiClassifier;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ClassifierConfig;
use crate::error::ColscanResult;
use crate::models::NOT_APPLICABLE;

/// Labels offered to the model when no rules are configured
pub const DEFAULT_CATEGORIES: [&str; 17] = [
    "FIRST_NAME",
    "LAST_NAME",
    "DATE_OF_BIRTH",
    "GENDER",
    "SSN",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "ADDRESS",
    "POSTAL_CODE",
    "USERNAME",
    "PASSWORD",
    "API_KEY",
    "CREDIT_CARD_NUMBER",
    "BANK_ACCOUNT",
    "IP_ADDRESS",
    "MAC_ADDRESS",
    "HOSTNAME",
];

/// One column's worth of classification input
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub column_name: String,
    pub samples: Vec<String>,
    allowed_labels: Vec<String>,
}

impl ClassificationRequest {
    /// Build a request; `N/A` is always appended to the allowed labels
    pub fn new<S: AsRef<str>>(
        column_name: impl Into<String>,
        samples: Vec<String>,
        categories: &[S],
    ) -> Self {
        let mut allowed_labels: Vec<String> = Vec::with_capacity(categories.len() + 1);
        for category in categories {
            let label = category.as_ref().trim().to_ascii_uppercase();
            if !label.is_empty() && label != NOT_APPLICABLE && !allowed_labels.contains(&label) {
                allowed_labels.push(label);
            }
        }
        allowed_labels.push(NOT_APPLICABLE.to_string());

        Self {
            column_name: column_name.into(),
            samples,
            allowed_labels,
        }
    }

    pub fn allowed_labels(&self) -> &[String] {
        &self.allowed_labels
    }
}

/// Assigns a label to a column from its name and sample values
///
/// Implementations return a label from `request.allowed_labels()`. Transport
/// failures and non-success responses are errors; the caller decides how to
/// degrade.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Short provider name used in logs and errors
    fn provider(&self) -> &str;

    async fn classify(&self, request: &ClassificationRequest) -> ColscanResult<String>;
}

/// Build the classifier selected by `config`
pub fn classifier_from_config(config: &ClassifierConfig) -> ColscanResult<Arc<dyn ContentClassifier>> {
    Ok(Arc::new(OpenAiClassifier::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_always_allows_not_applicable() {
        let request = ClassificationRequest::new("email", vec![], &["email_address", "SSN", "SSN", "N/A"]);
        assert_eq!(request.allowed_labels(), ["EMAIL_ADDRESS", "SSN", "N/A"]);

        let empty: [&str; 0] = [];
        let request = ClassificationRequest::new("x", vec![], &empty);
        assert_eq!(request.allowed_labels(), ["N/A"]);
    }

    #[test]
    fn test_factory_builds_ollama_without_key() {
        let config = ClassifierConfig {
            provider: crate::config::LlmProvider::Ollama,
            ..Default::default()
        };
        let classifier = classifier_from_config(&config).unwrap();
        assert_eq!(classifier.provider(), "ollama");
    }
}
