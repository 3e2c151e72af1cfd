//! Extraction direction: flattens the normalized document into the four
//! denormalized sheets the editors work in.
//!
//! The Participants sheet is the registry; every other sheet references
//! people by name only. Nested structures (papers under a session, films
//! under a screening slot) become header/detail row runs where the
//! grouping column is populated on the header row and blank on the detail
//! rows.

use crate::model::{Document, ParticipantRef};
use crate::registry::Registry;

/// Sheet name for the participant registry.
pub const PARTICIPANTS_SHEET: &str = "Participants";
/// Sheet name for sessions and their papers.
pub const SESSIONS_SHEET: &str = "Sessions & Papers";
/// Sheet name for timetable events.
pub const EVENTS_SHEET: &str = "Events";
/// Sheet name for screening slots and their films.
pub const SCREENINGS_SHEET: &str = "Screenings";

// Header fills match the palette the editors are used to.
const PARTICIPANTS_FILL: u32 = 0x4472C4;
const SESSIONS_FILL: u32 = 0x70AD47;
const EVENTS_FILL: u32 = 0xFFC000;
const SCREENINGS_FILL: u32 = 0xC55A11;

/// A table that will be materialised as a styled worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_fill: u32,
}

impl SheetTable {
    fn new(sheet_name: &str, header_fill: u32, columns: &[&str]) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
            header_fill,
        }
    }
}

/// Represents all tables required to materialise the workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

/// Flattens the document into the four-sheet workbook layout.
pub fn build_workbook(document: &Document) -> WorkbookData {
    WorkbookData {
        tables: vec![
            participants_table(document),
            sessions_table(document),
            events_table(document),
            screenings_table(document),
        ],
    }
}

fn participants_table(document: &Document) -> SheetTable {
    let registry = Registry::from_document(document);
    let mut table = SheetTable::new(PARTICIPANTS_SHEET, PARTICIPANTS_FILL, &["Name", "Institution"]);

    for (name, institution) in registry.iter() {
        table.rows.push(vec![
            name.to_string(),
            institution.unwrap_or_default().to_string(),
        ]);
    }

    table
}

fn sessions_table(document: &Document) -> SheetTable {
    let mut table = SheetTable::new(
        SESSIONS_SHEET,
        SESSIONS_FILL,
        &[
            "Session #",
            "Type",
            "Title",
            "Description",
            "Presenters/Authors",
            "Abstract",
        ],
    );

    for (id, session) in document.sessions.iter() {
        table.rows.push(vec![
            format!("SESSION {id}"),
            session.kind.clone(),
            session.title.clone(),
            session.description.clone(),
            join_names(&session.presenters),
            String::new(),
        ]);

        for paper in &session.papers {
            table.rows.push(vec![
                String::new(),
                "paper".to_string(),
                paper.title.clone(),
                String::new(),
                join_names(&paper.authors),
                paper.abstract_text.clone(),
            ]);
        }
    }

    table
}

fn events_table(document: &Document) -> SheetTable {
    let mut table = SheetTable::new(
        EVENTS_SHEET,
        EVENTS_FILL,
        &[
            "Day",
            "Time",
            "Venue",
            "Type",
            "Content",
            "Presenters",
            "Abstract",
        ],
    );

    for event in &document.events {
        let presenters = event
            .presenters
            .as_deref()
            .map(join_names)
            .unwrap_or_default();
        // The Abstract column is meaningful for plenaries only.
        let abstract_text = if event.kind == "plenary" {
            event.abstract_text.clone().unwrap_or_default()
        } else {
            String::new()
        };

        table.rows.push(vec![
            event.day.clone(),
            event.time.clone(),
            event.venue.clone(),
            event.kind.clone(),
            event.content.clone(),
            presenters,
            abstract_text,
        ]);
    }

    table
}

fn screenings_table(document: &Document) -> SheetTable {
    let mut table = SheetTable::new(
        SCREENINGS_SHEET,
        SCREENINGS_FILL,
        &[
            "Screening Slot",
            "Film Title",
            "Year",
            "Duration (mins)",
            "Creatives",
        ],
    );

    for event in &document.events {
        if !event.is_screening() {
            continue;
        }

        table.rows.push(vec![
            event.slot_key(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);

        for film in event.films.as_deref().unwrap_or_default() {
            table.rows.push(vec![
                String::new(),
                film.title.clone(),
                film.year.map(|year| year.to_string()).unwrap_or_default(),
                film.duration
                    .map(|duration| duration.to_string())
                    .unwrap_or_default(),
                join_names(&film.creatives),
            ]);
        }
    }

    table
}

fn join_names(people: &[ParticipantRef]) -> String {
    people
        .iter()
        .map(|person| person.name.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
