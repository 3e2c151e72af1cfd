#![allow(dead_code)]

use confsync::model::Document;
use confsync::table::{Cell, SheetSet, Table};

pub fn document(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("document parsed")
}

pub fn table(name: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    Table::new(
        name,
        columns.iter().map(|column| column.to_string()).collect(),
        rows,
    )
}

/// Builds a row of text cells; empty strings become empty cells.
pub fn text_row(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(cell.to_string())
            }
        })
        .collect()
}

pub fn participants_table(rows: Vec<Vec<Cell>>) -> Table {
    table("Participants", &["Name", "Institution"], rows)
}

pub fn sessions_table(rows: Vec<Vec<Cell>>) -> Table {
    table(
        "Sessions & Papers",
        &[
            "Session #",
            "Type",
            "Title",
            "Description",
            "Presenters/Authors",
            "Abstract",
        ],
        rows,
    )
}

pub fn events_table(rows: Vec<Vec<Cell>>) -> Table {
    table(
        "Events",
        &[
            "Day",
            "Time",
            "Venue",
            "Type",
            "Content",
            "Presenters",
            "Abstract",
        ],
        rows,
    )
}

pub fn screenings_table(rows: Vec<Vec<Cell>>) -> Table {
    table(
        "Screenings",
        &[
            "Screening Slot",
            "Film Title",
            "Year",
            "Duration (mins)",
            "Creatives",
        ],
        rows,
    )
}

pub fn sheets(
    participants: Vec<Vec<Cell>>,
    sessions: Vec<Vec<Cell>>,
    events: Vec<Vec<Cell>>,
    screenings: Vec<Vec<Cell>>,
) -> SheetSet {
    SheetSet {
        participants: participants_table(participants),
        sessions: sessions_table(sessions),
        events: events_table(events),
        screenings: screenings_table(screenings),
    }
}

pub fn empty_sheets() -> SheetSet {
    sheets(Vec::new(), Vec::new(), Vec::new(), Vec::new())
}
