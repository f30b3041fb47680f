//! Constructor methods for ColscanError

use super::types::ColscanError;

impl ColscanError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an invalid rule error
    pub fn invalid_rule(
        type_name: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRule {
            type_name: type_name.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            context: None,
        }
    }

    /// Create a catalog error with context
    pub fn catalog_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: None,
        }
    }

    /// Create a storage error with context
    pub fn storage_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new classifier error
    pub fn classifier(message: impl Into<String>) -> Self {
        Self::Classifier {
            message: message.into(),
            provider: None,
        }
    }

    /// Create a classifier error tagged with its provider
    pub fn classifier_with_provider(
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self::Classifier {
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Create a timeout error
    pub fn timeout(millis: u64) -> Self {
        Self::Timeout {
            millis,
            context: None,
        }
    }

    /// Create a timeout error with context
    pub fn timeout_with_context(millis: u64, context: impl Into<String>) -> Self {
        Self::Timeout {
            millis,
            context: Some(context.into()),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
        }
    }

    /// Create a not found error for a resource type
    pub fn not_found_resource(message: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: Some(resource_type.into()),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error for a field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Attach a scan id, unless one is already attached
    pub fn in_scan(self, scan_id: i64) -> Self {
        match self {
            already @ Self::ScanFailed { .. } => already,
            other => Self::ScanFailed {
                scan_id,
                source: Box::new(other),
            },
        }
    }
}
