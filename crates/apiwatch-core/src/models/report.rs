use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record::ErrorRecord;

/// Result of pointing the dashboard at a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub rows: Option<usize>,
    pub columns: Vec<String>,
    pub from_cache: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadReport {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.rows.is_some()
    }
}

/// Filtered rows for the detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPage {
    pub total: usize,
    pub matched: usize,
    pub records: Vec<ErrorRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub rows: usize,
    pub bytes: Vec<u8>,
}
