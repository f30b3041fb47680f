//! Scan orchestration
//!
//! A scan creates a `running` history record, enumerates the target server,
//! labels every column and persists each label as soon as it is known. The
//! record is moved to `success` or `failed` exactly once by [`ScanService::finish`],
//! which also runs when the scan body panics. A scan future dropped before it
//! finishes leaves a `StatusGuard` behind that marks the record `failed`.

use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::summary::ScanSummary;
use super::view::group_results;
use crate::catalog::{Catalog, Sampler, walk};
use crate::concurrency::{TaskOutcome, WorkerPool, WorkerPoolConfig};
use crate::config::ScanConfig;
use crate::error::{ColscanError, ColscanResult};
use crate::llm::{ClassificationRequest, ContentClassifier, DEFAULT_CATEGORIES, normalize_label};
use crate::models::{ColumnResult, NOT_APPLICABLE, ScanRecord, ScanResultView, ScanStatus, TableRef};
use crate::rules::ClassifierSet;
use crate::storage::{RuleStore, ScanStore};

/// A column that still needs content classification
struct WorkItem {
    table: TableRef,
    request: ClassificationRequest,
}

/// Errors collected from workers
///
/// A fatal error (the result sink failed) always wins over recoverable
/// per-column errors; among recoverable errors the first one recorded wins.
#[derive(Default)]
struct ErrorSink {
    recoverable: Mutex<Vec<ColscanError>>,
    fatal: Mutex<Option<ColscanError>>,
}

impl ErrorSink {
    fn record(&self, error: ColscanError) {
        self.recoverable.lock().push(error);
    }

    fn record_fatal(&self, error: ColscanError) {
        self.fatal.lock().get_or_insert(error);
    }

    fn has_fatal(&self) -> bool {
        self.fatal.lock().is_some()
    }

    fn recoverable_count(&self) -> usize {
        self.recoverable.lock().len()
    }

    fn first_error(&self) -> Option<ColscanError> {
        if let Some(fatal) = self.fatal.lock().clone() {
            return Some(fatal);
        }
        self.recoverable.lock().first().cloned()
    }
}

/// Marks a scan `failed` if its future is dropped before `finish` runs
struct StatusGuard {
    scans: Arc<dyn ScanStore>,
    scan_id: i64,
    armed: bool,
}

impl StatusGuard {
    fn new(scans: Arc<dyn ScanStore>, scan_id: i64) -> Self {
        Self {
            scans,
            scan_id,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StatusGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let scan_id = self.scan_id;
        warn!(scan_id, "scan abandoned before completion, marking failed");
        match Handle::try_current() {
            Ok(handle) => {
                let scans = self.scans.clone();
                handle.spawn(async move {
                    if let Err(e) = scans.update_status(scan_id, ScanStatus::Failed).await {
                        error!(scan_id, error = %e, "failed to record status of abandoned scan");
                    }
                });
            }
            Err(_) => error!(scan_id, "no runtime to record status of abandoned scan"),
        }
    }
}

/// Runs scans and serves their results
pub struct ScanService {
    rules: Arc<dyn RuleStore>,
    scans: Arc<dyn ScanStore>,
    classifier: Option<Arc<dyn ContentClassifier>>,
    config: ScanConfig,
    /// Parent of every running sampling scan's token, replaced on `cancel_all`
    shutdown: Mutex<CancellationToken>,
}

impl ScanService {
    pub fn new(rules: Arc<dyn RuleStore>, scans: Arc<dyn ScanStore>, config: ScanConfig) -> Self {
        Self {
            rules,
            scans,
            classifier: None,
            config,
            shutdown: Mutex::new(CancellationToken::new()),
        }
    }

    /// Enable sampling scans with the given content classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Label every column by name only
    ///
    /// Returns the scan id. Any error after the history record exists comes
    /// back as `ScanFailed` carrying that id.
    #[instrument(skip(self, catalog))]
    pub async fn execute_scan(&self, database_id: i64, catalog: &dyn Catalog) -> ColscanResult<i64> {
        let scan_id = self.start(database_id).await?;
        let guard = StatusGuard::new(self.scans.clone(), scan_id);
        let outcome = AssertUnwindSafe(self.run_name_scan(scan_id, catalog))
            .catch_unwind()
            .await;
        self.finish(guard, outcome).await
    }

    /// Label by name, falling back to sampled content classification
    pub async fn execute_scan_with_sampling(
        &self,
        database_id: i64,
        catalog: Arc<dyn Catalog>,
    ) -> ColscanResult<i64> {
        self.execute_scan_with_sampling_and_cancel(database_id, catalog, CancellationToken::new())
            .await
    }

    /// Sampling scan that stops dispatching and interrupts in-flight calls
    /// once `cancel` fires
    ///
    /// Interrupted columns are recorded as `N/A` and the scan ends `failed`.
    #[instrument(skip(self, catalog, cancel))]
    pub async fn execute_scan_with_sampling_and_cancel(
        &self,
        database_id: i64,
        catalog: Arc<dyn Catalog>,
        cancel: CancellationToken,
    ) -> ColscanResult<i64> {
        let classifier = self.classifier.clone().ok_or_else(|| {
            ColscanError::config("Sampling scans need a content classifier")
        })?;

        let scan_id = self.start(database_id).await?;
        let guard = StatusGuard::new(self.scans.clone(), scan_id);
        let outcome = AssertUnwindSafe(self.run_sampling_scan(
            scan_id,
            catalog.as_ref(),
            classifier,
            cancel,
        ))
        .catch_unwind()
        .await;
        self.finish(guard, outcome).await
    }

    /// Cancel every sampling scan currently running on this service
    pub fn cancel_all(&self) {
        let mut shutdown = self.shutdown.lock();
        shutdown.cancel();
        *shutdown = CancellationToken::new();
    }

    /// Move a running scan to a terminal status
    ///
    /// Finished scans keep their status; asking for the same status again is
    /// a no-op.
    pub async fn update_scan_status(&self, scan_id: i64, status: ScanStatus) -> ColscanResult<()> {
        let record = self.get_scan(scan_id).await?;
        if record.status == status {
            return Ok(());
        }
        if record.status.is_terminal() {
            return Err(ColscanError::invalid_input_field(
                format!("Scan {} already finished as {}", scan_id, record.status),
                "status",
            ));
        }
        self.scans.update_status(scan_id, status).await?;
        Ok(())
    }

    pub async fn get_scan(&self, scan_id: i64) -> ColscanResult<ScanRecord> {
        self.scans
            .get_history(scan_id)
            .await?
            .ok_or_else(|| ColscanError::not_found_resource(format!("scan {}", scan_id), "scan"))
    }

    /// Results of a scan grouped as schema -> table -> column
    pub async fn get_scan_results(&self, scan_id: i64) -> ColscanResult<ScanResultView> {
        self.get_scan(scan_id).await?;
        let results = self.scans.get_results_by_scan_id(scan_id).await?;
        Ok(group_results(&results))
    }

    pub async fn get_scan_summary(&self, scan_id: i64) -> ColscanResult<ScanSummary> {
        let record = self.get_scan(scan_id).await?;
        let results = self.scans.get_results_by_scan_id(scan_id).await?;
        Ok(ScanSummary::from_results(&record, &results))
    }

    async fn start(&self, database_id: i64) -> ColscanResult<i64> {
        let scan_id = self
            .scans
            .create_history(database_id)
            .await
            .map_err(|e| ColscanError::storage_with_context(e.to_string(), "creating scan history"))?;
        info!(scan_id, database_id, "scan started");
        Ok(scan_id)
    }

    /// Write the terminal status exactly once and shape the caller's result
    async fn finish(
        &self,
        mut guard: StatusGuard,
        outcome: std::thread::Result<ColscanResult<()>>,
    ) -> ColscanResult<i64> {
        let scan_id = guard.scan_id;
        let status = match &outcome {
            Ok(Ok(())) => ScanStatus::Success,
            _ => ScanStatus::Failed,
        };

        let written = self.scans.update_status(scan_id, status).await;
        guard.disarm();
        if let Err(e) = written {
            error!(scan_id, status = %status, error = %e, "failed to record scan status");
            if status == ScanStatus::Success {
                return Err(ColscanError::storage_with_context(e.to_string(), "updating scan status")
                    .in_scan(scan_id));
            }
        }

        match outcome {
            Ok(Ok(())) => {
                info!(scan_id, "scan succeeded");
                Ok(scan_id)
            }
            Ok(Err(e)) => {
                error!(scan_id, error = %e, "scan failed");
                Err(e.in_scan(scan_id))
            }
            Err(panic) => {
                error!(scan_id, "scan panicked");
                std::panic::resume_unwind(panic)
            }
        }
    }

    async fn load_classifiers(&self) -> ColscanResult<ClassifierSet> {
        let rules = self
            .rules
            .get_all_rules()
            .await
            .map_err(|e| ColscanError::storage_with_context(e.to_string(), "loading rules"))?;
        let classifiers = ClassifierSet::build(&rules)?;
        debug!(rules = classifiers.len(), "compiled classification rules");
        Ok(classifiers)
    }

    async fn run_name_scan(&self, scan_id: i64, catalog: &dyn Catalog) -> ColscanResult<()> {
        let classifiers = self.load_classifiers().await?;
        let tables = walk(catalog).await?;

        let mut columns = 0usize;
        for (table, names) in &tables {
            for column in names {
                let info_type = classifiers.classify(column);
                persist(self.scans.as_ref(), scan_id, table, column, info_type).await?;
                columns += 1;
            }
        }

        info!(scan_id, tables = tables.len(), columns, "name scan complete");
        Ok(())
    }

    async fn run_sampling_scan(
        &self,
        scan_id: i64,
        catalog: &dyn Catalog,
        classifier: Arc<dyn ContentClassifier>,
        cancel: CancellationToken,
    ) -> ColscanResult<()> {
        let classifiers = self.load_classifiers().await?;
        let categories: Vec<String> = if classifiers.is_empty() {
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
        } else {
            classifiers.categories()
        };

        let scan_token = self.shutdown.lock().child_token();

        // Discovery and sampling finish before the first classification call.
        let tables = walk(catalog).await?;
        let sampler = Sampler::new(self.config.sample_limit);
        let mut work = Vec::new();
        for (table, names) in tables {
            for column in names {
                let info_type = classifiers.classify(&column);
                if info_type != NOT_APPLICABLE {
                    persist(self.scans.as_ref(), scan_id, &table, &column, info_type).await?;
                    continue;
                }

                if cancel.is_cancelled() {
                    scan_token.cancel();
                }
                // Once cancelled, remaining columns skip sampling and resolve
                // as cancelled in the pool.
                if scan_token.is_cancelled() {
                    work.push(WorkItem {
                        table: table.clone(),
                        request: ClassificationRequest::new(column, Vec::new(), &categories),
                    });
                    continue;
                }

                let samples = sampler.sample(catalog, &table, &column).await;
                if samples.is_empty() {
                    debug!(table = %table, column = %column, "no samples, skipping classification");
                    persist(self.scans.as_ref(), scan_id, &table, &column, NOT_APPLICABLE).await?;
                    continue;
                }

                work.push(WorkItem {
                    table: table.clone(),
                    request: ClassificationRequest::new(column, samples, &categories),
                });
            }
        }

        self.classify_all(scan_id, work, classifier, cancel, scan_token)
            .await
    }

    /// Fan work items out over the worker pool and wait for all of them
    async fn classify_all(
        &self,
        scan_id: i64,
        work: Vec<WorkItem>,
        classifier: Arc<dyn ContentClassifier>,
        cancel: CancellationToken,
        scan_token: CancellationToken,
    ) -> ColscanResult<()> {
        info!(scan_id, work_items = work.len(), provider = classifier.provider(), "dispatching content classification");

        let pool = WorkerPool::new(WorkerPoolConfig::from(&self.config));
        let sink = Arc::new(ErrorSink::default());
        let mut workers = JoinSet::new();
        for item in work {
            let pool = pool.clone();
            let token = scan_token.clone();
            let sink = sink.clone();
            let classifier = classifier.clone();
            let scans = self.scans.clone();

            workers.spawn(async move {
                let info_type = classify_item(&pool, &token, classifier.as_ref(), &item, &sink).await;
                if sink.has_fatal() {
                    return;
                }
                let column = &item.request.column_name;
                if let Err(e) = persist(scans.as_ref(), scan_id, &item.table, column, &info_type).await {
                    error!(scan_id, table = %item.table, column = %column, error = %e, "result store failed, cancelling scan");
                    sink.record_fatal(e);
                    token.cancel();
                }
            });
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled(), if !scan_token.is_cancelled() => {
                    warn!(scan_id, "scan cancelled by caller");
                    scan_token.cancel();
                }
                joined = workers.join_next() => match joined {
                    None => break,
                    Some(Err(e)) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Some(_) => {}
                },
            }
        }

        let stats = pool.stats();
        info!(
            scan_id,
            started = stats.started,
            completed = stats.completed,
            timed_out = stats.timed_out,
            cancelled = stats.cancelled,
            peak_in_flight = stats.peak_in_flight,
            errors = sink.recoverable_count(),
            "content classification finished"
        );

        match sink.first_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Resolve one work item to a label, never leaving it unresolved
async fn classify_item(
    pool: &WorkerPool,
    token: &CancellationToken,
    classifier: &dyn ContentClassifier,
    item: &WorkItem,
    sink: &ErrorSink,
) -> String {
    let request = &item.request;
    match pool.execute(token, classifier.classify(request)).await {
        TaskOutcome::Completed(Ok(label)) => normalize_label(&label, request.allowed_labels()),
        TaskOutcome::Completed(Err(e)) => {
            error!(table = %item.table, column = %request.column_name, provider = classifier.provider(), error = %e, "classification failed");
            sink.record(e);
            NOT_APPLICABLE.to_string()
        }
        TaskOutcome::TimedOut(limit) => {
            let timeout_ms = millis(limit);
            warn!(table = %item.table, column = %request.column_name, timeout_ms, "classification timed out");
            sink.record(ColscanError::timeout_with_context(
                timeout_ms,
                format!("{}.{}", item.table, request.column_name),
            ));
            NOT_APPLICABLE.to_string()
        }
        TaskOutcome::Cancelled => {
            debug!(table = %item.table, column = %request.column_name, "classification cancelled");
            sink.record(ColscanError::Cancelled);
            NOT_APPLICABLE.to_string()
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn persist(
    scans: &dyn ScanStore,
    scan_id: i64,
    table: &TableRef,
    column: &str,
    info_type: &str,
) -> ColscanResult<()> {
    scans
        .save_result(&ColumnResult::new(scan_id, &table.schema, &table.table, column, info_type))
        .await
        .map_err(|e| {
            ColscanError::storage_with_context(e.to_string(), format!("saving {}.{}", table, column))
        })
}
