//! Top-level configuration

use serde::{Deserialize, Serialize};

use super::{ClassifierConfig, LoggingConfig, ScanConfig, StorageConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub classifier: ClassifierConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
