use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::flatten::{EVENTS_SHEET, PARTICIPANTS_SHEET, SCREENINGS_SHEET, SESSIONS_SHEET};
use crate::table::{Cell, SheetSet, Table};

/// Reads the four fixed sheets from a workbook following the conventions
/// produced by the [`excel_write`](crate::io::excel_write) module.
pub fn read_sheets(path: &Path) -> Result<SheetSet> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    Ok(SheetSet {
        participants: read_required_sheet(&mut workbook, PARTICIPANTS_SHEET)?,
        sessions: read_required_sheet(&mut workbook, SESSIONS_SHEET)?,
        events: read_required_sheet(&mut workbook, EVENTS_SHEET)?,
        screenings: read_required_sheet(&mut workbook, SCREENINGS_SHEET)?,
    })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Table> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;

    let mut raw_rows = range.rows();
    let columns: Vec<String> = match raw_rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_value(cell).clean_text())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<Cell>> = raw_rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::new(name, columns, rows))
}

fn cell_value(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        other => Cell::Text(other.to_string()),
    }
}
