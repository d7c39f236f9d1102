use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{ErrorLog, Period, PeriodOption};

const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    Es,
    En,
}

impl MonthLocale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Self::Es => &MONTHS_ES,
            Self::En => &MONTHS_EN,
        };
        month
            .checked_sub(1)
            .and_then(|idx| names.get(idx as usize))
            .copied()
            .unwrap_or("?")
    }

    #[must_use]
    pub fn label(self, period: Period) -> String {
        format!("{} {}", self.month_name(period.month()), period.year())
    }
}

impl fmt::Display for MonthLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonthLocale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported month locale: {other} (expected es|en)")),
        }
    }
}

/// Distinct periods among timestamped records, most recent first.
#[must_use]
pub fn available_periods(log: &ErrorLog, locale: MonthLocale) -> Vec<PeriodOption> {
    let mut counts = BTreeMap::<Period, usize>::new();
    for record in log {
        if let Some(period) = record.period() {
            *counts.entry(period).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .rev()
        .map(|(period, count)| PeriodOption {
            period,
            label: locale.label(period),
            count,
        })
        .collect()
}

#[must_use]
pub fn latest_period(log: &ErrorLog) -> Option<Period> {
    log.iter().filter_map(|record| record.period()).max()
}
