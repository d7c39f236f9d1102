use chrono::NaiveDateTime;

use crate::models::{ErrorLog, ErrorRecord, Field, Severity};
use crate::text::non_empty_cell;

use super::timestamp::{excel_serial_to_datetime, format_timestamp, parse_timestamp};

/// A cell as handed over by a reader, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    /// Untyped numeric cell; a serial date when it sits in the timestamp column.
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::DateTime(_) => false,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) => format_float(*value),
            Self::DateTime(value) => format_timestamp(*value),
        }
    }

    fn to_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Empty => None,
            Self::Text(text) => parse_timestamp(text),
            Self::Number(serial) => excel_serial_to_datetime(*serial),
            Self::DateTime(value) => Some(*value),
        }
    }
}

// Spreadsheet ids often arrive as floats; keep them integral when they are.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Rows that carry at least one non-blank cell.
    pub(crate) fn data_row_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .count()
    }

    pub(crate) fn into_error_log(self) -> ErrorLog {
        let columns = self
            .headers
            .iter()
            .map(|header| header.trim().to_string())
            .collect::<Vec<_>>();
        let shell = ErrorLog::new(columns, Vec::new());
        let width = shell.columns().len();

        let records = self
            .rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .map(|row| normalize_row(&shell, row, width))
            .collect();
        shell.derive(records)
    }
}

fn normalize_row(shell: &ErrorLog, mut row: Vec<Cell>, width: usize) -> ErrorRecord {
    row.resize(width, Cell::Empty);
    let text_of = |field: Field| {
        shell
            .column_index(field)
            .and_then(|idx| row.get(idx))
            .and_then(|cell| non_empty_cell(&cell.to_text()))
    };

    let timestamp_idx = shell.column_index(Field::Timestamp);
    let timestamp = timestamp_idx
        .and_then(|idx| row.get(idx))
        .and_then(Cell::to_timestamp);
    let mut cells = row.iter().map(Cell::to_text).collect::<Vec<_>>();
    // Serial dates are shown as dates, not as the raw number.
    if let (Some(idx), Some(value)) = (timestamp_idx, timestamp)
        && matches!(row.get(idx), Some(Cell::Number(_)))
    {
        cells[idx] = format_timestamp(value);
    }

    ErrorRecord {
        timestamp,
        error_type: text_of(Field::ErrorType),
        severity: text_of(Field::Severity).and_then(|raw| Severity::parse(&raw)),
        message: text_of(Field::Message),
        entity_id: text_of(Field::EntityId),
        api_endpoint: text_of(Field::ApiEndpoint),
        cells,
    }
}
