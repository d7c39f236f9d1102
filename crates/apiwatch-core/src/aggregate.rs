use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDateTime};

use crate::models::{
    CountEntry, CountTable, DailyPoint, DateSpanStats, ErrorLog, Field, HourlyHistogram,
    MessageCount, Severity, SeverityKpis, TypeShare,
};
use crate::text::{CHART_LABEL_CHARS, LONG_FORM_LABEL_CHARS, truncate_text};

/// Counts of a text field, first-seen order, blanks skipped.
/// `None` when the log has no such column.
#[must_use]
pub fn count_by(log: &ErrorLog, field: Field) -> Option<CountTable> {
    if !log.has_field(field) {
        return None;
    }

    let mut entries = Vec::<CountEntry>::new();
    let mut slots = HashMap::<&str, usize>::new();
    for value in log.iter().filter_map(|record| record.text(field)) {
        if let Some(&slot) = slots.get(value) {
            entries[slot].count += 1;
        } else {
            slots.insert(value, entries.len());
            entries.push(CountEntry {
                value: value.to_string(),
                count: 1,
            });
        }
    }
    Some(CountTable { entries })
}

#[must_use]
pub fn top_n_messages(log: &ErrorLog, limit: usize) -> Vec<MessageCount> {
    let Some(table) = count_by(log, Field::Message) else {
        return Vec::new();
    };
    table
        .top(limit)
        .into_iter()
        .map(|entry| MessageCount {
            label: truncate_text(&entry.value, LONG_FORM_LABEL_CHARS),
            chart_label: truncate_text(&entry.value, CHART_LABEL_CHARS),
            message: entry.value,
            count: entry.count,
        })
        .collect()
}

#[must_use]
pub fn hourly_histogram(log: &ErrorLog) -> HourlyHistogram {
    let mut histogram = HourlyHistogram::zeroed();
    for hour in log.iter().filter_map(|record| record.hour()) {
        if let Some(bucket) = histogram.buckets.get_mut(hour as usize) {
            bucket.count += 1;
        }
    }
    histogram
}

/// One point per calendar day that has records, ascending.
#[must_use]
pub fn daily_series(log: &ErrorLog) -> Vec<DailyPoint> {
    let mut days = BTreeMap::new();
    for day in log.iter().filter_map(|record| record.day()) {
        *days.entry(day).or_insert(0usize) += 1;
    }
    days.into_iter()
        .map(|(day, count)| DailyPoint { day, count })
        .collect()
}

#[must_use]
pub fn date_span_stats(log: &ErrorLog) -> Option<DateSpanStats> {
    let first = log.timestamps().min()?;
    let last = log.timestamps().max()?;
    let distinct_days = log
        .iter()
        .filter_map(|record| record.day())
        .collect::<BTreeSet<_>>()
        .len();
    let span_days = usize::try_from((last.date() - first.date()).num_days())
        .unwrap_or(0)
        .saturating_add(1);

    Some(DateSpanStats {
        first,
        last,
        distinct_days,
        span_days,
        records_per_day: average_per_day(log.len(), span_days),
    })
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "record counts are far below f64 integer precision and the quotient is non-negative"
)]
fn average_per_day(records: usize, days: usize) -> usize {
    let days = days.max(1);
    (records as f64 / days as f64).round() as usize
}

/// Records in the same calendar month and year as `reference`.
#[must_use]
pub fn this_month_count(log: &ErrorLog, reference: NaiveDateTime) -> usize {
    log.timestamps()
        .filter(|ts| ts.year() == reference.year() && ts.month() == reference.month())
        .count()
}

#[must_use]
pub fn severity_kpis(log: &ErrorLog) -> Option<SeverityKpis> {
    if !log.has_field(Field::Severity) {
        return None;
    }
    let mut kpis = SeverityKpis {
        total: log.len(),
        ..SeverityKpis::default()
    };
    for severity in log.iter().filter_map(|record| record.severity.as_ref()) {
        match severity {
            Severity::Critical => kpis.critical += 1,
            Severity::High => kpis.high += 1,
            Severity::Medium => kpis.medium += 1,
            Severity::Low => kpis.low += 1,
            Severity::Other(_) => {}
        }
    }
    Some(kpis)
}

/// Per-type count and share of the whole filtered log, ranked.
#[must_use]
pub fn type_shares(log: &ErrorLog) -> Option<Vec<TypeShare>> {
    let table = count_by(log, Field::ErrorType)?;
    let total = log.len();
    Some(
        table
            .ranked()
            .into_iter()
            .map(|entry| TypeShare {
                percent: percent_one_decimal(entry.count, total),
                error_type: entry.value,
                count: entry.count,
            })
            .collect(),
    )
}

#[expect(
    clippy::cast_precision_loss,
    reason = "record counts are far below f64 integer precision"
)]
fn percent_one_decimal(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

#[must_use]
pub fn distinct_count(log: &ErrorLog, field: Field) -> Option<usize> {
    count_by(log, field).map(|table| table.len())
}

#[cfg(test)]
mod tests;
