use std::time::Instant;

use chrono::Utc;
use serde_json::json;

use crate::dashboard::DashboardState;
use crate::error::{ApiwatchError, Result};
use crate::load::{DataSource, LoadOutcome};
use crate::models::LoadReport;

use super::Apiwatch;

impl Apiwatch {
    /// Source used when a caller names none: the configured remote sheet.
    pub fn default_source(&self) -> Result<DataSource> {
        self.config
            .remote_url
            .clone()
            .map(|url| DataSource::Remote { url })
            .ok_or_else(|| {
                ApiwatchError::Validation(
                    "no source given and no remote URL configured (set APIWATCH_REMOTE_URL)"
                        .to_string(),
                )
            })
    }

    /// Loads `source` into `state`. Failures never propagate: the state ends
    /// up holding the error message instead of a log.
    pub fn load_source(&self, state: &mut DashboardState, source: DataSource) -> LoadReport {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let now = Utc::now();
        let key = source.key();

        let result = self.loader.load(&source, now);
        match &result {
            Ok(loaded) if loaded.log.is_empty() => self.request_log.log_request_warning(
                request_id,
                "source.load",
                started,
                Some(key.clone()),
                "source has no data rows",
                Some(json!({ "from_cache": loaded.from_cache })),
            ),
            Ok(loaded) => self.request_log.log_request_status(
                request_id,
                "source.load",
                "ok",
                started,
                Some(key.clone()),
                Some(json!({
                    "rows": loaded.log.len(),
                    "columns": loaded.log.columns().len(),
                    "from_cache": loaded.from_cache,
                })),
            ),
            Err(err) => self.request_log.log_request_error(
                request_id,
                "source.load",
                started,
                Some(key.clone()),
                err,
                None,
            ),
        }

        let outcome = LoadOutcome::from_result(&source, result);
        state.apply_outcome(source, outcome, now);
        load_report(state, key)
    }

    /// Drops any cached snapshot of the current source and loads it again.
    pub fn refresh(&self, state: &mut DashboardState) -> Result<LoadReport> {
        let source = state.source.clone().ok_or_else(|| {
            ApiwatchError::Validation("no source loaded; nothing to refresh".to_string())
        })?;
        self.loader.invalidate(&source);
        Ok(self.load_source(state, source))
    }
}

fn load_report(state: &DashboardState, source: String) -> LoadReport {
    LoadReport {
        source,
        rows: state.loaded_rows(),
        columns: state
            .log
            .as_ref()
            .map(|log| log.columns().to_vec())
            .unwrap_or_default(),
        from_cache: state.from_cache,
        loaded_at: state.loaded_at,
        error: state.last_error.clone(),
    }
}
