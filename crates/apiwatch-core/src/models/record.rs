use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::period::Period;

/// Canonical columns understood by the aggregator. Anything else in the
/// source passes through to export untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    ErrorType,
    Severity,
    Message,
    EntityId,
    ApiEndpoint,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::Timestamp,
        Self::ErrorType,
        Self::Severity,
        Self::Message,
        Self::EntityId,
        Self::ApiEndpoint,
    ];

    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Timestamp => "fecha",
            Self::ErrorType => "tipo_error",
            Self::Severity => "severidad",
            Self::Message => "error_message",
            Self::EntityId => "entidad_id",
            Self::ApiEndpoint => "api_endpoint",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Timestamp => 0,
            Self::ErrorType => 1,
            Self::Severity => 2,
            Self::Message => 3,
            Self::EntityId => 4,
            Self::ApiEndpoint => 5,
        }
    }

    #[must_use]
    pub fn from_column_name(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.column_name() == normalized)
    }
}

/// Severity levels. Source sheets use Spanish labels, which are accepted as
/// aliases; anything unrecognized is kept verbatim and never grouped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    pub const LEVELS: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let upper = trimmed.to_uppercase();
        let level = match upper.as_str() {
            "CRITICAL" | "CRITICA" | "CRÍTICA" => Self::Critical,
            "HIGH" | "ALTA" => Self::High,
            "MEDIUM" | "MEDIA" => Self::Medium,
            "LOW" | "BAJA" => Self::Low,
            _ => Self::Other(upper),
        };
        Some(level)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| "severity must not be empty".to_string())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub error_type: Option<String>,
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub entity_id: Option<String>,
    pub api_endpoint: Option<String>,
    /// Raw cells aligned with [`ErrorLog::columns`].
    #[serde(skip)]
    pub cells: Vec<String>,
}

impl ErrorRecord {
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.hour())
    }

    #[must_use]
    pub fn period(&self) -> Option<Period> {
        self.timestamp.map(|ts| Period::of(ts.date()))
    }

    /// Text value of a canonical field; timestamps are not textual here.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Timestamp => None,
            Field::ErrorType => self.error_type.as_deref(),
            Field::Severity => self.severity.as_ref().map(Severity::as_str),
            Field::Message => self.message.as_deref(),
            Field::EntityId => self.entity_id.as_deref(),
            Field::ApiEndpoint => self.api_endpoint.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FieldColumns {
    slots: [Option<usize>; 6],
}

impl FieldColumns {
    fn resolve(columns: &[String]) -> Self {
        let mut slots = [None; 6];
        for (idx, name) in columns.iter().enumerate() {
            if let Some(field) = Field::from_column_name(name)
                && slots[field.slot()].is_none()
            {
                slots[field.slot()] = Some(idx);
            }
        }
        Self { slots }
    }

    const fn index_of(&self, field: Field) -> Option<usize> {
        self.slots[field.slot()]
    }
}

/// One source snapshot. Immutable once built; filters derive new logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    columns: Vec<String>,
    fields: FieldColumns,
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    #[must_use]
    pub fn new(columns: Vec<String>, records: Vec<ErrorRecord>) -> Self {
        let fields = FieldColumns::resolve(&columns);
        Self {
            columns,
            fields,
            records,
        }
    }

    /// Same columns, different rows.
    #[must_use]
    pub fn derive(&self, records: Vec<ErrorRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            fields: self.fields,
            records,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn column_index(&self, field: Field) -> Option<usize> {
        self.fields.index_of(field)
    }

    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.index_of(field).is_some()
    }

    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRecord> {
        self.records.iter()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.records.iter().filter_map(|record| record.timestamp)
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
