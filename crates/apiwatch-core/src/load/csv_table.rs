use csv::ReaderBuilder;

use crate::error::{ApiwatchError, Result};

use super::table::{Cell, RawTable};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn read_csv_table(bytes: &[u8]) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(ApiwatchError::Load(
            "csv source has no header row".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(value.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}
