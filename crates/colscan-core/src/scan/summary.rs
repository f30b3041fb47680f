//! Per-scan totals for reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::view::UNKNOWN_SCHEMA;
use crate::models::{ColumnResult, NOT_APPLICABLE, ScanRecord, ScanStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoTypeCount {
    pub info_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub schema_name: String,
    pub table_name: String,
    pub total_columns: usize,
    pub sensitive_columns: usize,
    pub by_info_type: Vec<InfoTypeCount>,
}

/// Counts by info type, overall and per table
///
/// `by_info_type` is ordered by descending count, then by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: i64,
    pub database_id: i64,
    pub status: ScanStatus,
    pub created_at: DateTime<Utc>,
    pub total_columns: usize,
    pub sensitive_columns: usize,
    pub by_info_type: Vec<InfoTypeCount>,
    pub tables: Vec<TableSummary>,
}

impl ScanSummary {
    pub fn from_results(record: &ScanRecord, results: &[ColumnResult]) -> Self {
        let mut tables: BTreeMap<(&str, &str), Vec<&ColumnResult>> = BTreeMap::new();
        for result in results {
            let schema = match result.schema_name.trim() {
                "" => UNKNOWN_SCHEMA,
                name => name,
            };
            tables
                .entry((schema, result.table_name.as_str()))
                .or_default()
                .push(result);
        }

        let tables = tables
            .into_iter()
            .map(|((schema, table), rows)| TableSummary {
                schema_name: schema.to_string(),
                table_name: table.to_string(),
                total_columns: rows.len(),
                sensitive_columns: count_sensitive(rows.iter().copied()),
                by_info_type: count_by_type(rows.iter().copied()),
            })
            .collect();

        Self {
            scan_id: record.id,
            database_id: record.database_id,
            status: record.status,
            created_at: record.created_at,
            total_columns: results.len(),
            sensitive_columns: count_sensitive(results.iter()),
            by_info_type: count_by_type(results.iter()),
            tables,
        }
    }

    /// Share of all columns labelled `info_type`, in percent
    pub fn percentage(&self, info_type: &str) -> f64 {
        let count = self
            .by_info_type
            .iter()
            .find(|c| c.info_type == info_type)
            .map_or(0, |c| c.count);
        percent(count, self.total_columns)
    }

    /// Share of columns with any label other than `N/A`, in percent
    pub fn sensitive_percentage(&self) -> f64 {
        percent(self.sensitive_columns, self.total_columns)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn count_sensitive<'a>(rows: impl Iterator<Item = &'a ColumnResult>) -> usize {
    rows.filter(|r| r.info_type != NOT_APPLICABLE).count()
}

fn count_by_type<'a>(rows: impl Iterator<Item = &'a ColumnResult>) -> Vec<InfoTypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.info_type.as_str()).or_default() += 1;
    }
    let mut counts: Vec<InfoTypeCount> = counts
        .into_iter()
        .map(|(info_type, count)| InfoTypeCount {
            info_type: info_type.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.info_type.cmp(&b.info_type)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ScanRecord {
        ScanRecord {
            id: 3,
            database_id: 1,
            status: ScanStatus::Success,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_counts_and_percentages() {
        let results = vec![
            ColumnResult::new(3, "crm", "contacts", "email", "EMAIL_ADDRESS"),
            ColumnResult::new(3, "crm", "contacts", "alt_email", "EMAIL_ADDRESS"),
            ColumnResult::new(3, "crm", "contacts", "notes", "N/A"),
            ColumnResult::new(3, "crm", "people", "ssn", "SSN"),
        ];
        let summary = ScanSummary::from_results(&record(), &results);

        assert_eq!(summary.total_columns, 4);
        assert_eq!(summary.sensitive_columns, 3);
        assert_eq!(summary.by_info_type[0].info_type, "EMAIL_ADDRESS");
        assert_eq!(summary.by_info_type[0].count, 2);
        assert_eq!(summary.percentage("EMAIL_ADDRESS"), 50.0);
        assert_eq!(summary.percentage("PASSWORD"), 0.0);
        assert_eq!(summary.sensitive_percentage(), 75.0);

        assert_eq!(summary.tables.len(), 2);
        let contacts = &summary.tables[0];
        assert_eq!(contacts.table_name, "contacts");
        assert_eq!(contacts.total_columns, 3);
        assert_eq!(contacts.sensitive_columns, 2);
    }

    #[test]
    fn test_empty_scan_has_zero_percentages() {
        let summary = ScanSummary::from_results(&record(), &[]);
        assert_eq!(summary.total_columns, 0);
        assert_eq!(summary.sensitive_percentage(), 0.0);
        assert!(summary.tables.is_empty());
    }
}
