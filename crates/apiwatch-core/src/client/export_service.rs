use std::time::Instant;

use chrono::Local;
use serde_json::json;

use crate::dashboard::DashboardState;
use crate::error::{ApiwatchError, Result};
use crate::export::{ExportScope, export_csv};
use crate::filter::{apply, selected_period};
use crate::models::{ExportFile, FilterCriteria};

use super::Apiwatch;

impl Apiwatch {
    /// CSV of the filtered view. An empty filter result is an error rather
    /// than a header-only file.
    pub fn export(&self, state: &DashboardState, criteria: &FilterCriteria) -> Result<ExportFile> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let source = state.source.as_ref().map(|source| source.key());

        let output = (|| -> Result<ExportFile> {
            let log = state.require_log()?;
            let filtered = apply(log, criteria);
            if filtered.is_empty() {
                return Err(ApiwatchError::EmptyResult(
                    "no records match the current filters".to_string(),
                ));
            }
            let scope = ExportScope::for_selection(
                selected_period(log, criteria.time),
                Local::now().date_naive(),
            );
            Ok(ExportFile {
                filename: scope.filename(),
                rows: filtered.len(),
                bytes: export_csv(&filtered)?,
            })
        })();

        match &output {
            Ok(file) => self.request_log.log_request_status(
                request_id,
                "export",
                "ok",
                started,
                source,
                Some(json!({ "filename": file.filename, "rows": file.rows })),
            ),
            Err(err) => self
                .request_log
                .log_request_error(request_id, "export", started, source, err, None),
        }
        output
    }
}
