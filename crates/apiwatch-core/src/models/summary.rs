use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::period::Period;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub value: String,
    pub count: usize,
}

/// Value counts in first-seen order. Use [`CountTable::ranked`] for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTable {
    pub entries: Vec<CountEntry>,
}

impl CountTable {
    /// Descending by count; equal counts keep first-seen order.
    #[must_use]
    pub fn ranked(&self) -> Vec<CountEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<CountEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        ranked
    }

    #[must_use]
    pub fn get(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map_or(0, |entry| entry.count)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCount {
    pub message: String,
    pub count: usize,
    /// Display label, clipped for the long-form list.
    pub label: String,
    /// Display label, clipped for chart axes.
    pub chart_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub count: usize,
}

/// Always 24 buckets, hour 0 through 23.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyHistogram {
    pub buckets: Vec<HourBucket>,
}

impl HourlyHistogram {
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            buckets: (0..24).map(|hour| HourBucket { hour, count: 0 }).collect(),
        }
    }

    #[must_use]
    pub fn count_at(&self, hour: u32) -> usize {
        self.buckets
            .iter()
            .find(|bucket| bucket.hour == hour)
            .map_or(0, |bucket| bucket.count)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpanStats {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    pub distinct_days: usize,
    /// Calendar days from the first to the last date, inclusive.
    pub span_days: usize,
    pub records_per_day: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityKpis {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShare {
    pub error_type: String,
    pub count: usize,
    /// Share of the filtered total, one decimal.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOption {
    pub period: Period,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub this_month: usize,
    pub critical_alert: Option<usize>,
    pub kpis: Option<SeverityKpis>,
    pub by_severity: Option<Vec<CountEntry>>,
    pub by_type: Option<Vec<CountEntry>>,
    pub type_shares: Option<Vec<TypeShare>>,
    pub hourly: Option<HourlyHistogram>,
    pub daily: Option<Vec<DailyPoint>>,
    pub top_messages: Vec<MessageCount>,
    pub date_span: Option<DateSpanStats>,
    pub distinct_types: Option<usize>,
    pub distinct_endpoints: Option<usize>,
    pub periods: Vec<PeriodOption>,
    pub selected_period: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    NoData {
        hint: String,
    },
    LoadFailed {
        message: String,
    },
    Empty {
        suggestion: String,
        loaded: usize,
        periods: Vec<PeriodOption>,
    },
    Ready {
        summary: Box<DashboardSummary>,
    },
}
