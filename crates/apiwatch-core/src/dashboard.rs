use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::aggregate::{
    count_by, daily_series, date_span_stats, distinct_count, hourly_histogram, severity_kpis,
    this_month_count, top_n_messages, type_shares,
};
use crate::error::{ApiwatchError, Result};
use crate::filter::{apply, selected_period};
use crate::load::{DataSource, LoadOutcome};
use crate::models::{
    DashboardSummary, DashboardView, ErrorLog, Field, FilterCriteria, Severity,
};
use crate::period::{MonthLocale, available_periods};

pub const DEFAULT_TOP_MESSAGES: usize = 5;
/// Error types shown in the ranked type table.
pub const TOP_TYPES: usize = 10;

const NO_DATA_HINT: &str =
    "no data loaded: upload a spreadsheet, point at a published CSV URL or load the demo dataset";
const EMPTY_SOURCE_SUGGESTION: &str = "the source has no data rows; check the sheet contents";
const EMPTY_FILTER_SUGGESTION: &str =
    "no records match the current filters; widen the severity selection or pick another period";

/// Session state for one dashboard: the loaded snapshot and how it got there.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub source: Option<DataSource>,
    #[serde(skip)]
    pub log: Option<Arc<ErrorLog>>,
    pub last_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
}

impl DashboardState {
    /// Replaces the snapshot with a load result. A failed load clears the log
    /// so stale data is never shown next to an error.
    pub fn apply_outcome(&mut self, source: DataSource, outcome: LoadOutcome, now: DateTime<Utc>) {
        self.source = Some(source);
        self.log = outcome.log;
        self.last_error = outcome.error;
        self.from_cache = outcome.from_cache;
        self.loaded_at = self.log.as_ref().map(|_| now);
    }

    /// The loaded log, or the reason there is none.
    pub fn require_log(&self) -> Result<&Arc<ErrorLog>> {
        self.log.as_ref().ok_or_else(|| match &self.last_error {
            Some(message) => ApiwatchError::Load(message.clone()),
            None => ApiwatchError::Validation("no data loaded".to_string()),
        })
    }

    #[must_use]
    pub fn loaded_rows(&self) -> Option<usize> {
        self.log.as_ref().map(|log| log.len())
    }
}

#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub criteria: FilterCriteria,
    /// "Now" for this-month counts.
    pub reference_time: NaiveDateTime,
    pub top_n: usize,
    pub locale: MonthLocale,
}

impl DashboardRequest {
    #[must_use]
    pub fn new(criteria: FilterCriteria, reference_time: NaiveDateTime) -> Self {
        Self {
            criteria,
            reference_time,
            top_n: DEFAULT_TOP_MESSAGES,
            locale: MonthLocale::default(),
        }
    }
}

#[must_use]
pub fn render(state: &DashboardState, request: &DashboardRequest) -> DashboardView {
    let Some(log) = state.log.as_deref() else {
        return match &state.last_error {
            Some(message) => DashboardView::LoadFailed {
                message: message.clone(),
            },
            None => DashboardView::NoData {
                hint: NO_DATA_HINT.to_string(),
            },
        };
    };

    if log.is_empty() {
        return DashboardView::Empty {
            suggestion: EMPTY_SOURCE_SUGGESTION.to_string(),
            loaded: 0,
            periods: Vec::new(),
        };
    }

    let filtered = apply(log, &request.criteria);
    if filtered.is_empty() {
        return DashboardView::Empty {
            suggestion: EMPTY_FILTER_SUGGESTION.to_string(),
            loaded: log.len(),
            periods: available_periods(log, request.locale),
        };
    }

    DashboardView::Ready {
        summary: Box::new(build_summary(log, &filtered, request)),
    }
}

/// Every aggregate over `filtered`; period choices come from the full `log`.
#[must_use]
pub fn build_summary(
    log: &ErrorLog,
    filtered: &ErrorLog,
    request: &DashboardRequest,
) -> DashboardSummary {
    let has_time = filtered.has_field(Field::Timestamp);
    let by_severity = count_by(filtered, Field::Severity);
    let critical_alert = by_severity
        .as_ref()
        .map(|table| table.get(Severity::Critical.as_str()))
        .filter(|count| *count > 0);

    DashboardSummary {
        total: filtered.len(),
        this_month: this_month_count(filtered, request.reference_time),
        critical_alert,
        kpis: severity_kpis(filtered),
        by_severity: by_severity.map(|table| table.ranked()),
        by_type: count_by(filtered, Field::ErrorType).map(|table| table.top(TOP_TYPES)),
        type_shares: type_shares(filtered),
        hourly: has_time.then(|| hourly_histogram(filtered)),
        daily: has_time.then(|| daily_series(filtered)),
        top_messages: top_n_messages(filtered, request.top_n),
        date_span: date_span_stats(filtered),
        distinct_types: distinct_count(filtered, Field::ErrorType),
        distinct_endpoints: distinct_count(filtered, Field::ApiEndpoint),
        periods: available_periods(log, request.locale),
        selected_period: selected_period(log, request.criteria.time),
    }
}
