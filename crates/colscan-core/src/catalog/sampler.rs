//! Bounded value sampling

use tracing::{debug, warn};

use super::Catalog;
use crate::models::TableRef;

/// Default number of distinct values pulled per column
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Pulls a few distinct values of a column for content classification
///
/// Sampling never fails the scan: a column the server cannot project is
/// logged and treated as having no samples.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    limit: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_LIMIT)
    }
}

impl Sampler {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub async fn sample(&self, catalog: &dyn Catalog, table: &TableRef, column: &str) -> Vec<String> {
        if self.limit == 0 {
            return Vec::new();
        }
        match catalog.sample_column(table, column, self.limit).await {
            Ok(mut values) => {
                values.truncate(self.limit);
                debug!(table = %table, column, count = values.len(), "sampled column");
                values
            }
            Err(e) => {
                warn!(table = %table, column, error = %e, "skipping samples for column");
                Vec::new()
            }
        }
    }
}
