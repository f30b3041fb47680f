//! Internal store connection settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where rules, registered databases and scan results live
///
/// `url` wins when set; otherwise the URL is assembled from the parts.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "colscan".to_string(),
            max_connections: 10,
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl StorageConfig {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.password.is_empty() {
            format!(
                "mysql://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            )
        } else {
            format!(
                "mysql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_from_parts() {
        let config = StorageConfig {
            password: "pw".to_string(),
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "mysql://root:pw@localhost:3306/colscan");

        let config = StorageConfig::default();
        assert_eq!(config.connection_url(), "mysql://root@localhost:3306/colscan");
    }

    #[test]
    fn test_explicit_url_wins() {
        let config = StorageConfig {
            url: Some("mysql://app@db:3307/meta".to_string()),
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "mysql://app@db:3307/meta");
    }
}
