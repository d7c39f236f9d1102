use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::period::Period;
use super::record::Severity;

/// `All` is the untouched selector; `Only` with an empty set is an explicit
/// "nothing selected" and filters every row out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "levels", rename_all = "snake_case")]
pub enum SeveritySelection {
    #[default]
    All,
    Only(BTreeSet<Severity>),
}

impl SeveritySelection {
    pub fn only(levels: impl IntoIterator<Item = Severity>) -> Self {
        Self::Only(levels.into_iter().collect())
    }

    #[must_use]
    pub fn admits(&self, severity: Option<&Severity>) -> bool {
        match self {
            Self::All => true,
            Self::Only(levels) => severity.is_some_and(|level| levels.contains(level)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeWindow {
    #[default]
    FullHistory,
    DateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    Month {
        period: Period,
    },
    /// Most recent period present in the log being filtered.
    LatestPeriod,
}

impl TimeWindow {
    /// Normalizes a range so that `start <= end`.
    #[must_use]
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self::DateRange { start, end }
        } else {
            Self::DateRange {
                start: end,
                end: start,
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub severities: SeveritySelection,
    pub time: TimeWindow,
    pub error_type: Option<String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_severities(mut self, severities: SeveritySelection) -> Self {
        self.severities = severities;
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: TimeWindow) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_error_type(mut self, error_type: Option<String>) -> Self {
        self.error_type = error_type
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }
}
