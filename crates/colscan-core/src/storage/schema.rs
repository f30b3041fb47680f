//! Internal schema and migrations for the MySQL store

use std::fmt;

/// Schema version identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(pub u32);

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A forward-only migration
///
/// MySQL prepared statements carry one statement each, so a migration is a
/// list of statements executed in order.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: SchemaVersion,
    pub name: &'static str,
    pub statements: Vec<&'static str>,
}

impl Migration {
    pub fn new(version: u32, name: &'static str, statements: Vec<&'static str>) -> Self {
        Self {
            version: SchemaVersion(version),
            name,
            statements,
        }
    }
}

/// Bookkeeping table for applied versions
pub const MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INT UNSIGNED NOT NULL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// All migrations, sorted by version
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "initial_schema",
            vec![
                "CREATE TABLE IF NOT EXISTS classification_rules (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    type_name VARCHAR(64) NOT NULL,
                    regex VARCHAR(1024) NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS external_databases (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    host VARCHAR(255) NOT NULL,
                    port INT UNSIGNED NOT NULL,
                    username VARCHAR(255) NOT NULL,
                    password VARCHAR(255) NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS scan_history (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    database_id BIGINT NOT NULL,
                    status VARCHAR(16) NOT NULL,
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    INDEX idx_scan_history_database (database_id)
                )",
                "CREATE TABLE IF NOT EXISTS scan_results (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    scan_id BIGINT NOT NULL,
                    schema_name VARCHAR(255) NOT NULL DEFAULT '',
                    table_name VARCHAR(255) NOT NULL,
                    column_name VARCHAR(255) NOT NULL,
                    info_type VARCHAR(64) NOT NULL,
                    INDEX idx_scan_results_scan (scan_id)
                )",
            ],
        ),
        Migration::new(
            2,
            "unique_rule_type_pattern",
            vec![
                "CREATE UNIQUE INDEX idx_rules_type_pattern ON classification_rules (type_name, regex(255))",
            ],
        ),
    ]
}
