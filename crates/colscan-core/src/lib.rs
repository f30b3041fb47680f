//! Colscan Core Library
//!
//! Scan engine that labels every column of a database server with a
//! sensitivity category: operator regex rules on the column name first, then
//! sampled values sent to a content classifier when no rule matches.

pub mod catalog;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod rules;
pub mod scan;
pub mod storage;

// Re-export commonly used types
pub use catalog::{Catalog, InMemoryCatalog, MySqlCatalog, Sampler};
pub use concurrency::{RateLimiter, TaskOutcome, WorkerPool, WorkerPoolConfig};
pub use config::{AppConfig, ConfigValidator, ScanConfig};
pub use error::{ColscanError, ColscanResult};
pub use llm::{ClassificationRequest, ContentClassifier, OpenAiClassifier, classifier_from_config};
pub use models::{
    ClassificationRule, ColumnResult, ExternalDatabase, NOT_APPLICABLE, ScanRecord, ScanResultView,
    ScanStatus, TableRef,
};
pub use rules::{ClassifierSet, RegexClassifier};
pub use scan::{ScanService, ScanSummary};
pub use storage::{DatabaseError, DatabaseRegistry, InMemoryStore, MySqlStore, RuleStore, ScanStore};
