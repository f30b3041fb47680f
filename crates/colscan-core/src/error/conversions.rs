//! From trait implementations for ColscanError conversions

use super::types::ColscanError;
use crate::storage::DatabaseError;

impl From<std::io::Error> for ColscanError {
    fn from(error: std::io::Error) -> Self {
        Self::storage_with_context(error.to_string(), "io")
    }
}

impl From<serde_json::Error> for ColscanError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", error))
    }
}

impl From<reqwest::Error> for ColscanError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::timeout_with_context(0, error.to_string());
        }
        let message = match error.status() {
            Some(status) => format!("HTTP {}: {}", status.as_u16(), error),
            None => error.to_string(),
        };
        Self::classifier(message)
    }
}

impl From<regex::Error> for ColscanError {
    fn from(error: regex::Error) -> Self {
        Self::invalid_input_field(error.to_string(), "pattern")
    }
}

impl From<DatabaseError> for ColscanError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(msg) => Self::not_found_resource(msg, "database record"),
            DatabaseError::Constraint(msg) => {
                Self::invalid_input_field("Database constraint violation", msg)
            }
            DatabaseError::Migration(msg) => {
                Self::storage(format!("Database migration failed: {}", msg))
            }
            other => Self::storage(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ColscanError {
    fn from(error: sqlx::Error) -> Self {
        Self::from(DatabaseError::from(error))
    }
}
