//! Core error type for colscan

use thiserror::Error;

/// Result type alias for colscan operations
pub type ColscanResult<T> = Result<T, ColscanError>;

/// Main error type for colscan
#[derive(Error, Debug, Clone)]
pub enum ColscanError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// A classification rule whose pattern does not compile
    #[error("Invalid rule {type_name} ({pattern}): {message}")]
    InvalidRule {
        type_name: String,
        pattern: String,
        message: String,
    },

    /// Metadata catalog of the scanned server is unreachable or refused a query
    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        context: Option<String>,
    },

    /// Rule store / scan history store errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// Content classification service errors
    #[error("Classifier error: {message}")]
    Classifier {
        message: String,
        provider: Option<String>,
    },

    /// A classification call exceeded its deadline
    #[error("Classification timed out after {millis} ms")]
    Timeout {
        millis: u64,
        context: Option<String>,
    },

    /// Work was cancelled by the caller
    #[error("Scan was cancelled")]
    Cancelled,

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// A scan that was recorded but did not fully succeed
    #[error("Scan {scan_id} failed: {source}")]
    ScanFailed {
        scan_id: i64,
        #[source]
        source: Box<ColscanError>,
    },
}

impl ColscanError {
    /// Scan id attached to the error, if a scan record was created
    pub fn scan_id(&self) -> Option<i64> {
        match self {
            Self::ScanFailed { scan_id, .. } => Some(*scan_id),
            _ => None,
        }
    }

    /// Innermost error, unwrapping `ScanFailed`
    pub fn root(&self) -> &ColscanError {
        match self {
            Self::ScanFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the error only degrades a single column instead of the whole scan
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.root(),
            Self::Classifier { .. } | Self::Timeout { .. } | Self::Cancelled
        )
    }

    /// Short code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::InvalidRule { .. } => "INVALID_RULE",
            Self::Catalog { .. } => "CATALOG_ERROR",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Classifier { .. } => "CLASSIFIER_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::ScanFailed { .. } => "SCAN_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_failed_exposes_scan_id_and_root() {
        let err = ColscanError::timeout(8000).in_scan(42);
        assert_eq!(err.scan_id(), Some(42));
        assert!(matches!(err.root(), ColscanError::Timeout { millis: 8000, .. }));
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "SCAN_FAILED");
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        assert!(!ColscanError::storage("disk full").is_recoverable());
        assert!(!ColscanError::catalog("access denied").is_recoverable());
        assert!(!ColscanError::invalid_rule("SSN", "(", "unclosed group").is_recoverable());
        assert!(ColscanError::classifier("503").is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = ColscanError::invalid_rule("SSN", "(", "unclosed group");
        assert_eq!(err.to_string(), "Invalid rule SSN ((): unclosed group");

        let err = ColscanError::storage("insert failed").in_scan(7);
        assert_eq!(err.to_string(), "Scan 7 failed: Storage error: insert failed");
    }
}
