use std::io::{Cursor, Read, Seek};

use calamine::{Data, DataType, Range, Reader, Sheets, open_workbook_auto_from_rs};

use crate::error::{ApiwatchError, Result};

use super::table::{Cell, RawTable};

/// Sheet names tried before falling back to workbook order.
pub const PREFERRED_SHEETS: [&str; 3] = ["Todos los Errores", "Sheet1", "Hoja1"];

pub(crate) fn read_workbook_bytes(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_workbook(&mut workbook)
}

fn read_workbook<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<RawTable> {
    let names = workbook.sheet_names();
    let Some(first) = names.first().cloned() else {
        return Err(ApiwatchError::Load("workbook has no sheets".to_string()));
    };

    for candidate in sheet_preference(&names) {
        let table = range_to_table(&workbook.worksheet_range(candidate)?);
        if table.data_row_count() > 0 {
            return Ok(table);
        }
    }

    Ok(range_to_table(&workbook.worksheet_range(&first)?))
}

/// Preferred names that exist, then every sheet in workbook order, without repeats.
pub(crate) fn sheet_preference(names: &[String]) -> Vec<&str> {
    let mut ordered = Vec::with_capacity(names.len());
    let preferred = PREFERRED_SHEETS
        .iter()
        .filter_map(|wanted| names.iter().find(|name| name.as_str() == *wanted));
    for name in preferred.chain(names.iter()) {
        if !ordered.contains(&name.as_str()) {
            ordered.push(name.as_str());
        }
    }
    ordered
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return RawTable::default();
    };

    RawTable {
        headers: header_row.iter().map(ToString::to_string).collect(),
        rows: rows.map(|row| row.iter().map(to_cell).collect()).collect(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Int(value) => Cell::Text(value.to_string()),
        Data::Float(value) => Cell::Number(*value),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map_or_else(|| Cell::Text(data.to_string()), Cell::DateTime),
        other => Cell::Text(other.to_string()),
    }
}
