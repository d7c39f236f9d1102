use std::time::Instant;

use chrono::Local;
use serde_json::json;

use crate::dashboard::{DashboardRequest, DashboardState, render};
use crate::error::Result;
use crate::filter::apply;
use crate::models::{DashboardView, FilterCriteria, PeriodOption, RecordPage};
use crate::period::available_periods;

use super::Apiwatch;

impl Apiwatch {
    /// Request settings from config, stamped with the local wall clock.
    #[must_use]
    pub fn dashboard_request(&self, criteria: FilterCriteria) -> DashboardRequest {
        DashboardRequest {
            criteria,
            reference_time: Local::now().naive_local(),
            top_n: self.config.top_messages,
            locale: self.config.month_locale,
        }
    }

    pub fn dashboard(&self, state: &DashboardState, criteria: FilterCriteria) -> DashboardView {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let source = state.source.as_ref().map(|source| source.key());

        let view = render(state, &self.dashboard_request(criteria));
        match &view {
            DashboardView::Ready { summary } => self.request_log.log_request_status(
                request_id,
                "dashboard",
                "ok",
                started,
                source,
                Some(json!({ "total": summary.total })),
            ),
            DashboardView::Empty { suggestion, .. } => self.request_log.log_request_warning(
                request_id,
                "dashboard",
                started,
                source,
                suggestion,
                None,
            ),
            DashboardView::NoData { hint } => self.request_log.log_request_warning(
                request_id,
                "dashboard",
                started,
                source,
                hint,
                None,
            ),
            DashboardView::LoadFailed { message } => self.request_log.log_request_warning(
                request_id,
                "dashboard",
                started,
                source,
                message,
                None,
            ),
        }
        view
    }

    pub fn periods(&self, state: &DashboardState) -> Result<Vec<PeriodOption>> {
        let log = state.require_log()?;
        Ok(available_periods(log, self.config.month_locale))
    }

    /// Filtered rows in source order, capped at `limit` when given.
    pub fn records(
        &self,
        state: &DashboardState,
        criteria: &FilterCriteria,
        limit: Option<usize>,
    ) -> Result<RecordPage> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let source = state.source.as_ref().map(|source| source.key());

        let output = state.require_log().map(|log| {
            let filtered = apply(log, criteria);
            let matched = filtered.len();
            let mut records = filtered.records().to_vec();
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            RecordPage {
                total: log.len(),
                matched,
                records,
            }
        });

        match &output {
            Ok(page) => self.request_log.log_request_status(
                request_id,
                "records",
                "ok",
                started,
                source,
                Some(json!({ "matched": page.matched, "returned": page.records.len() })),
            ),
            Err(err) => self
                .request_log
                .log_request_error(request_id, "records", started, source, err, None),
        }
        output
    }
}
