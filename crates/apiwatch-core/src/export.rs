use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiwatchError, Result};
use crate::load::format_timestamp;
use crate::models::{ErrorLog, ErrorRecord, Field, Period};

const EXPORT_PREFIX: &str = "errores_api";

/// What an export file covers; decides the download name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ExportScope {
    Date { date: NaiveDate },
    Period { period: Period },
}

impl ExportScope {
    /// The selected period when there is one, otherwise `today`.
    #[must_use]
    pub fn for_selection(selected: Option<Period>, today: NaiveDate) -> Self {
        selected.map_or(Self::Date { date: today }, |period| Self::Period { period })
    }

    #[must_use]
    pub fn filename(self) -> String {
        match self {
            Self::Date { date } => format!("{EXPORT_PREFIX}_{}.csv", date.format("%Y%m%d")),
            Self::Period { period } => format!("{EXPORT_PREFIX}_{period}.csv"),
        }
    }
}

/// Writes the log as UTF-8 CSV: header row from the source columns, one row
/// per record, timestamps normalized.
pub fn export_csv(log: &ErrorLog) -> Result<Vec<u8>> {
    let columns = log.columns();
    let timestamp_idx = log.column_index(Field::Timestamp);
    let fields = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            Field::from_column_name(name).filter(|field| log.column_index(*field) == Some(idx))
        })
        .collect::<Vec<_>>();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in log {
        let row = (0..columns.len()).map(|idx| {
            if Some(idx) == timestamp_idx {
                return record.timestamp.map(format_timestamp).unwrap_or_default();
            }
            cell_text(record, idx, fields[idx])
        });
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ApiwatchError::Internal(format!("csv export flush failed: {err}")))
}

fn cell_text(record: &ErrorRecord, idx: usize, field: Option<Field>) -> String {
    if let Some(raw) = record.cells.get(idx) {
        return raw.clone();
    }
    field
        .and_then(|field| record.text(field))
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::Severity;

    fn log() -> ErrorLog {
        let columns = ["fecha", "severidad", "notes"]
            .iter()
            .map(ToString::to_string)
            .collect();
        ErrorLog::new(
            columns,
            vec![
                ErrorRecord {
                    timestamp: NaiveDateTime::parse_from_str("2024-01-05 10:00", "%Y-%m-%d %H:%M")
                        .ok(),
                    severity: Some(Severity::Critical),
                    cells: vec![
                        "05/01/2024 10:00".to_string(),
                        "CRITICA".to_string(),
                        "first, with comma".to_string(),
                    ],
                    ..ErrorRecord::default()
                },
                ErrorRecord {
                    timestamp: None,
                    severity: Some(Severity::Low),
                    ..ErrorRecord::default()
                },
            ],
        )
    }

    #[test]
    fn export_keeps_source_columns_and_normalizes_timestamps() {
        let bytes = export_csv(&log()).expect("export");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "fecha,severidad,notes");
        assert_eq!(lines[1], "2024-01-05 10:00:00,CRITICA,\"first, with comma\"");
        assert_eq!(lines[2], ",LOW,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_of_empty_log_is_header_only() {
        let empty = log().derive(Vec::new());
        let text = String::from_utf8(export_csv(&empty).expect("export")).expect("utf8");
        assert_eq!(text, "fecha,severidad,notes\n");
    }

    #[test]
    fn filenames_follow_scope() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        assert_eq!(
            ExportScope::for_selection(None, today).filename(),
            "errores_api_20240309.csv"
        );
        let period = Period::new(2024, 1).expect("period");
        assert_eq!(
            ExportScope::for_selection(Some(period), today).filename(),
            "errores_api_2024-01.csv"
        );
    }
}
