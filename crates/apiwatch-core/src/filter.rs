use chrono::NaiveDate;

use crate::models::{ErrorLog, ErrorRecord, Field, FilterCriteria, Period, TimeWindow};
use crate::period::latest_period;

/// Time predicate with `LatestPeriod` already resolved against a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedWindow {
    Everything,
    Between(NaiveDate, NaiveDate),
    Within(Period),
}

/// Pure filter pass. The input log is left untouched.
#[must_use]
pub fn apply(log: &ErrorLog, criteria: &FilterCriteria) -> ErrorLog {
    let window = resolve_window(log, criteria.time);
    let check_severity = log.has_field(Field::Severity);
    let check_type = log.has_field(Field::ErrorType);

    let records = log
        .iter()
        .filter(|record| {
            (!check_severity || criteria.severities.admits(record.severity.as_ref()))
                && window_admits(window, record)
                && (!check_type || type_admits(criteria.error_type.as_deref(), record))
        })
        .cloned()
        .collect();
    log.derive(records)
}

/// The period a `TimeWindow` ends up selecting on `log`, if any.
#[must_use]
pub fn selected_period(log: &ErrorLog, time: TimeWindow) -> Option<Period> {
    match resolve_window(log, time) {
        ResolvedWindow::Within(period) => Some(period),
        ResolvedWindow::Everything | ResolvedWindow::Between(..) => None,
    }
}

fn resolve_window(log: &ErrorLog, time: TimeWindow) -> ResolvedWindow {
    if !log.has_field(Field::Timestamp) {
        return ResolvedWindow::Everything;
    }
    match time {
        TimeWindow::FullHistory => ResolvedWindow::Everything,
        TimeWindow::DateRange { start, end } => {
            ResolvedWindow::Between(start.min(end), start.max(end))
        }
        TimeWindow::Month { period } => ResolvedWindow::Within(period),
        TimeWindow::LatestPeriod => {
            latest_period(log).map_or(ResolvedWindow::Everything, ResolvedWindow::Within)
        }
    }
}

fn window_admits(window: ResolvedWindow, record: &ErrorRecord) -> bool {
    match window {
        ResolvedWindow::Everything => true,
        ResolvedWindow::Between(start, end) => record
            .day()
            .is_some_and(|day| start <= day && day <= end),
        ResolvedWindow::Within(period) => record.day().is_some_and(|day| period.contains(day)),
    }
}

fn type_admits(wanted: Option<&str>, record: &ErrorRecord) -> bool {
    wanted.is_none_or(|wanted| record.error_type.as_deref() == Some(wanted))
}
