use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a scan
///
/// `Running` moves exactly once to `Success` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Running,
    Success,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown scan status '{}'", other)),
        }
    }
}

/// One scan of one registered database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub database_id: i64,
    pub status: ScanStatus,
    pub created_at: DateTime<Utc>,
}

/// Classification outcome for a single column, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResult {
    pub scan_id: i64,
    #[serde(default)]
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub info_type: String,
}

impl ColumnResult {
    pub fn new(
        scan_id: i64,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        info_type: impl Into<String>,
    ) -> Self {
        Self {
            scan_id,
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            info_type: info_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [ScanStatus::Running, ScanStatus::Success, ScanStatus::Failed] {
            assert_eq!(status.as_str().parse::<ScanStatus>(), Ok(status));
        }
        assert_eq!(" FAILED ".parse::<ScanStatus>(), Ok(ScanStatus::Failed));
        assert!("done".parse::<ScanStatus>().is_err());
    }

    #[test]
    fn test_only_running_is_non_terminal() {
        assert!(!ScanStatus::Running.is_terminal());
        assert!(ScanStatus::Success.is_terminal());
        assert!(ScanStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ScanStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
