use chrono::NaiveDate;

use super::*;
use crate::filter::apply;
use crate::models::{ErrorRecord, FilterCriteria, SeveritySelection};

const ALL_COLUMNS: [&str; 6] = [
    "fecha",
    "tipo_error",
    "severidad",
    "error_message",
    "entidad_id",
    "api_endpoint",
];

fn ts(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok()
}

fn columns() -> Vec<String> {
    ALL_COLUMNS.iter().map(ToString::to_string).collect()
}

fn rec(when: Option<&str>, severity: &str, error_type: &str, message: &str) -> ErrorRecord {
    ErrorRecord {
        timestamp: when.and_then(ts),
        severity: Severity::parse(severity),
        error_type: Some(error_type.to_string()).filter(|v| !v.is_empty()),
        message: Some(message.to_string()).filter(|v| !v.is_empty()),
        api_endpoint: Some("GetDocument".to_string()),
        ..ErrorRecord::default()
    }
}

fn sample() -> ErrorLog {
    ErrorLog::new(
        columns(),
        vec![
            rec(Some("2024-01-05 10:00"), "CRITICA", "TIMEOUT", "b"),
            rec(Some("2024-01-05 14:00"), "ALTA", "AUTH", "a"),
            rec(Some("2024-01-07 14:30"), "CRITICA", "TIMEOUT", "a"),
            rec(None, "BAJA", "TIMEOUT", "b"),
            rec(Some("2024-02-01 09:00"), "", "", ""),
            rec(Some("2024-02-01 09:10"), "INFO", "AUTH", "c"),
        ],
    )
}

#[test]
fn count_by_keeps_first_seen_order_and_skips_blanks() {
    let table = count_by(&sample(), Field::ErrorType).expect("type column");
    let values = table
        .entries
        .iter()
        .map(|entry| (entry.value.as_str(), entry.count))
        .collect::<Vec<_>>();
    assert_eq!(values, vec![("TIMEOUT", 3), ("AUTH", 2)]);
}

#[test]
fn count_by_severity_sums_to_records_with_severity() {
    let log = sample();
    let table = count_by(&log, Field::Severity).expect("severity column");
    let with_severity = log.iter().filter(|r| r.severity.is_some()).count();
    assert_eq!(table.total(), with_severity);
    assert_eq!(with_severity, log.len() - 1);
    assert_eq!(table.get("INFO"), 1);
}

#[test]
fn count_by_is_absent_for_missing_column() {
    let log = ErrorLog::new(vec!["fecha".to_string()], Vec::new());
    assert_eq!(count_by(&log, Field::ApiEndpoint), None);
    assert_eq!(distinct_count(&log, Field::ApiEndpoint), None);
}

#[test]
fn critical_filter_scenario_counts_two() {
    let log = ErrorLog::new(
        columns(),
        vec![
            rec(None, "CRITICAL", "A", ""),
            rec(None, "CRITICAL", "A", ""),
            rec(None, "LOW", "A", ""),
        ],
    );
    let criteria =
        FilterCriteria::default().with_severities(SeveritySelection::only([Severity::Critical]));

    let filtered = apply(&log, &criteria);
    let table = count_by(&filtered, Field::Severity).expect("severity column");

    assert_eq!(filtered.len(), 2);
    assert_eq!(table.entries.len(), 1);
    assert_eq!(table.get("CRITICAL"), 2);
}

#[test]
fn top_messages_rank_by_count_then_first_appearance() {
    let top = top_n_messages(&sample(), 5);
    let ranked = top
        .iter()
        .map(|m| (m.message.as_str(), m.count))
        .collect::<Vec<_>>();
    assert_eq!(ranked, vec![("b", 2), ("a", 2), ("c", 1)]);

    let total_messages = sample().iter().filter(|r| r.message.is_some()).count();
    assert!(top.iter().map(|m| m.count).sum::<usize>() <= total_messages);
    assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
}

#[test]
fn top_messages_truncate_to_limit() {
    let top = top_n_messages(&sample(), 1);
    assert_eq!(top.len(), 1);
    assert!(top_n_messages(&sample(), 0).is_empty());
}

#[test]
fn long_messages_keep_full_text_beside_clipped_labels() {
    let long = "x".repeat(120);
    let log = ErrorLog::new(columns(), vec![rec(None, "", "", &long)]);
    let top = top_n_messages(&log, 5);
    assert_eq!(top[0].message, long);
    assert_eq!(top[0].label.chars().count(), 103);
    assert_eq!(top[0].chart_label, format!("{}...", "x".repeat(40)));
}

#[test]
fn hourly_histogram_has_24_buckets_even_when_empty() {
    let empty = hourly_histogram(&ErrorLog::default());
    assert_eq!(empty.buckets.len(), 24);
    assert_eq!(empty.total(), 0);
}

#[test]
fn hourly_histogram_two_hour_scenario() {
    let log = ErrorLog::new(
        columns(),
        vec![
            rec(Some("2024-01-05 10:00"), "", "", ""),
            rec(Some("2024-01-05 14:00"), "", "", ""),
        ],
    );
    let histogram = hourly_histogram(&log);
    assert_eq!(histogram.buckets.len(), 24);
    assert_eq!(histogram.count_at(10), 1);
    assert_eq!(histogram.count_at(14), 1);
    assert_eq!(
        histogram.buckets.iter().filter(|b| b.count == 0).count(),
        22
    );
    assert!(
        histogram
            .buckets
            .iter()
            .enumerate()
            .all(|(idx, b)| b.hour as usize == idx)
    );
}

#[test]
fn daily_series_only_lists_days_present() {
    let series = daily_series(&sample());
    let days = series.iter().map(|p| (p.day, p.count)).collect::<Vec<_>>();
    let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).expect("date");
    assert_eq!(days, vec![(day(1, 5), 2), (day(1, 7), 1), (day(2, 1), 2)]);
}

#[test]
fn date_span_stats_single_day_average_equals_len() {
    let log = ErrorLog::new(
        columns(),
        vec![
            rec(Some("2024-01-05 01:00"), "", "", ""),
            rec(Some("2024-01-05 02:00"), "", "", ""),
            rec(Some("2024-01-05 23:00"), "", "", ""),
        ],
    );
    let stats = date_span_stats(&log).expect("stats");
    assert_eq!(stats.span_days, 1);
    assert_eq!(stats.distinct_days, 1);
    assert_eq!(stats.records_per_day, log.len());
}

#[test]
fn date_span_stats_covers_calendar_span() {
    let stats = date_span_stats(&sample()).expect("stats");
    assert_eq!(stats.first, ts("2024-01-05 10:00").expect("ts"));
    assert_eq!(stats.last, ts("2024-02-01 09:10").expect("ts"));
    assert_eq!(stats.distinct_days, 3);
    assert_eq!(stats.span_days, 28);
    assert_eq!(stats.records_per_day, 0);
}

#[test]
fn this_month_count_requires_same_year_and_month() {
    let reference = ts("2024-01-20 12:00").expect("reference");
    assert_eq!(this_month_count(&sample(), reference), 3);

    let a_year_later = ts("2025-01-20 12:00").expect("reference");
    assert_eq!(this_month_count(&sample(), a_year_later), 0);
}

#[test]
fn severity_kpis_ignore_unknown_levels() {
    let kpis = severity_kpis(&sample()).expect("kpis");
    assert_eq!(
        kpis,
        SeverityKpis {
            total: 6,
            critical: 2,
            high: 1,
            medium: 0,
            low: 1,
        }
    );
}

#[test]
fn type_shares_use_whole_log_as_denominator() {
    let shares = type_shares(&sample()).expect("shares");
    assert_eq!(shares[0].error_type, "TIMEOUT");
    assert!((shares[0].percent - 50.0).abs() < f64::EPSILON);
    assert!((shares[1].percent - 33.3).abs() < 1e-9);
}

#[test]
fn empty_log_aggregates_are_empty_or_zero() {
    let log = ErrorLog::new(columns(), Vec::new());
    assert!(count_by(&log, Field::Severity).is_some_and(|t| t.is_empty()));
    assert!(top_n_messages(&log, 5).is_empty());
    assert_eq!(hourly_histogram(&log).total(), 0);
    assert!(daily_series(&log).is_empty());
    assert_eq!(date_span_stats(&log), None);
    assert_eq!(
        this_month_count(&log, ts("2024-01-01 00:00").expect("ts")),
        0
    );
    assert_eq!(distinct_count(&log, Field::ApiEndpoint), Some(0));
    assert!(type_shares(&log).is_some_and(|s| s.is_empty()));
}
