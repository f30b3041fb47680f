//! In-memory store
//!
//! Implements every store trait behind a single mutex. Used by tests, dry runs
//! and anywhere a real database is not wanted.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

use super::error::DatabaseError;
use super::r#trait::{DatabaseRegistry, RuleStore, ScanStore};
use crate::models::{ClassificationRule, ColumnResult, ExternalDatabase, ScanRecord, ScanStatus};

#[derive(Debug, Default)]
struct State {
    rules: Vec<ClassificationRule>,
    databases: Vec<ExternalDatabase>,
    history: Vec<ScanRecord>,
    results: Vec<ColumnResult>,
    /// Remaining successful `save_result` calls before writes start failing
    saves_before_failure: Option<usize>,
}

/// Store that keeps everything in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with rules, assigning ids in order
    pub fn with_rules(rules: impl IntoIterator<Item = ClassificationRule>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            for rule in rules {
                let id = state.rules.len() as i64 + 1;
                state.rules.push(rule.with_id(id));
            }
        }
        store
    }

    /// Make every `save_result` after the first `n` fail
    pub fn fail_saves_after(&self, n: usize) {
        self.state.lock().saves_before_failure = Some(n);
    }

    /// Every stored result, in insertion order
    pub fn all_results(&self) -> Vec<ColumnResult> {
        self.state.lock().results.clone()
    }

    pub fn history(&self) -> Vec<ScanRecord> {
        self.state.lock().history.clone()
    }
}

#[async_trait]
impl RuleStore for InMemoryStore {
    async fn get_all_rules(&self) -> Result<Vec<ClassificationRule>, DatabaseError> {
        Ok(self.state.lock().rules.clone())
    }

    async fn create_rule(&self, type_name: &str, pattern: &str) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock();
        let id = state.rules.len() as i64 + 1;
        state
            .rules
            .push(ClassificationRule::new(type_name, pattern).with_id(id));
        Ok(id)
    }
}

#[async_trait]
impl ScanStore for InMemoryStore {
    async fn create_history(&self, database_id: i64) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock();
        let id = state.history.len() as i64 + 1;
        state.history.push(ScanRecord {
            id,
            database_id,
            status: ScanStatus::Running,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update_status(&self, scan_id: i64, status: ScanStatus) -> Result<(), DatabaseError> {
        let mut state = self.state.lock();
        let record = state
            .history
            .iter_mut()
            .find(|r| r.id == scan_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("scan {}", scan_id)))?;
        record.status = status;
        Ok(())
    }

    async fn save_result(&self, result: &ColumnResult) -> Result<(), DatabaseError> {
        let mut state = self.state.lock();
        match state.saves_before_failure {
            Some(0) => {
                return Err(DatabaseError::Connection(
                    "result store unavailable".to_string(),
                ));
            }
            Some(ref mut remaining) => *remaining -= 1,
            None => {}
        }
        state.results.push(result.clone());
        Ok(())
    }

    async fn get_results_by_scan_id(
        &self,
        scan_id: i64,
    ) -> Result<Vec<ColumnResult>, DatabaseError> {
        let mut results: Vec<ColumnResult> = self
            .state
            .lock()
            .results
            .iter()
            .filter(|r| r.scan_id == scan_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| {
            (&a.schema_name, &a.table_name, &a.column_name).cmp(&(
                &b.schema_name,
                &b.table_name,
                &b.column_name,
            ))
        });
        Ok(results)
    }

    async fn get_history(&self, scan_id: i64) -> Result<Option<ScanRecord>, DatabaseError> {
        Ok(self
            .state
            .lock()
            .history
            .iter()
            .find(|r| r.id == scan_id)
            .cloned())
    }
}

#[async_trait]
impl DatabaseRegistry for InMemoryStore {
    async fn register(&self, database: &ExternalDatabase) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock();
        let id = state.databases.len() as i64 + 1;
        let mut stored = database.clone();
        stored.id = id;
        state.databases.push(stored);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<ExternalDatabase>, DatabaseError> {
        Ok(self
            .state
            .lock()
            .databases
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }
}
