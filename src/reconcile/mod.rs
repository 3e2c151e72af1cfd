//! Reconciliation direction: rebuilds the normalized document from the
//! four edited sheets plus the original document.
//!
//! Sheets are processed in a fixed order (Participants, Sessions &
//! Papers, Events, Screenings) because the registry is mutated while
//! names resolve, and later sheets must see people registered by earlier
//! ones. Row grouping is a single pass with no lookahead: each row is
//! classified as a header, a detail row or noise, and detail rows attach
//! to the most recent open group.

use std::collections::BTreeMap;

use crate::model::{Document, Event, Film, Paper, Session, SessionMap};
use crate::registry::Registry;
use crate::report::Report;
use crate::table::{Row, SheetSet, Table, format_time};

/// Reconciles the edited sheets against the original document.
///
/// Returns the updated document together with the diagnostics gathered
/// along the way. Nothing in here fails: malformed rows degrade to
/// warnings or silent defaults.
pub fn reconcile(original: &Document, sheets: &SheetSet) -> (Document, Report) {
    let mut report = Report::default();
    let mut registry = load_registry(&sheets.participants, &mut report);

    let sessions = rebuild_sessions(&sheets.sessions, original, &mut registry, &mut report);
    let mut events = rebuild_events(&sheets.events, original, &mut registry, &mut report);
    drop_orphaned_events(&mut events, &sessions, &mut report);
    let films_by_slot = rebuild_screenings(&sheets.screenings, &mut registry, &mut report);
    attach_films(&mut events, &films_by_slot);

    let panel_descriptions = sessions.panel_descriptions();
    let document = Document {
        conference: original.conference.clone(),
        venues: original.venues.clone(),
        events,
        sessions,
        panel_descriptions,
    };

    (document, report)
}

/// Seeds the registry from the Participants sheet. Later duplicate rows
/// win; rows with a blank name are skipped with a warning.
fn load_registry(table: &Table, report: &mut Report) -> Registry {
    let mut registry = Registry::default();

    for (index, row) in table.rows().enumerate() {
        let name = row.get("Name");
        if name.is_blank() {
            // The header occupies spreadsheet row 1.
            report.warn(format!(
                "Participants sheet row {} has a blank Name; skipping.",
                index + 2
            ));
            continue;
        }
        let institution = row.get("Institution");
        let institution = if institution.is_blank() {
            None
        } else {
            Some(institution.clean_text())
        };
        registry.insert(name.clean_text(), institution);
    }

    registry
}

/// Classification of one Sessions & Papers row.
enum SessionRowKind {
    /// Opens a new session group. The id is whatever follows the
    /// `SESSION` label.
    Header { id: String },
    Paper,
    Other,
}

fn classify_session_row(row: Row<'_>) -> SessionRowKind {
    let label = row.get("Session #").clean_text();
    if let Some(id) = label.strip_prefix("SESSION") {
        return SessionRowKind::Header {
            id: id.trim().to_string(),
        };
    }
    if row.get("Type").clean_text() == "paper" {
        return SessionRowKind::Paper;
    }
    SessionRowKind::Other
}

fn rebuild_sessions(
    table: &Table,
    original: &Document,
    registry: &mut Registry,
    report: &mut Report,
) -> SessionMap {
    let mut sessions = SessionMap::default();
    let mut current: Option<String> = None;

    for (index, row) in table.rows().enumerate() {
        match classify_session_row(row) {
            SessionRowKind::Header { id } => {
                let mut description = row.get("Description").clean_text();
                if description.is_empty() {
                    if let Some(stored) = original.panel_descriptions.get(&id) {
                        description = stored.trim().to_string();
                    }
                }

                let session = Session {
                    kind: row.get("Type").clean_text(),
                    title: row.get("Title").clean_text(),
                    description,
                    presenters: registry.resolve_list(row.get("Presenters/Authors"), report),
                    papers: Vec::new(),
                };
                sessions.insert(id.clone(), session);
                current = Some(id);
            }
            SessionRowKind::Paper => {
                let Some(id) = current.clone() else {
                    report.warn(format!(
                        "Sessions sheet row {}: paper '{}' has no preceding session header; row dropped.",
                        index + 2,
                        row.get("Title").clean_text()
                    ));
                    continue;
                };

                let paper = Paper {
                    title: row.get("Title").clean_text(),
                    abstract_text: row.get("Abstract").clean_text(),
                    authors: registry.resolve_list(row.get("Presenters/Authors"), report),
                };
                if let Some(session) = sessions.get_mut(&id) {
                    session.papers.push(paper);
                }
            }
            SessionRowKind::Other => {}
        }
    }

    sessions
}

fn rebuild_events(
    table: &Table,
    original: &Document,
    registry: &mut Registry,
    report: &mut Report,
) -> Vec<Event> {
    let mut events = Vec::new();

    for row in table.rows() {
        let day = row.get("Day").clean_text();
        let time = format_time(row.get("Time"));
        let venue = row.get("Venue").clean_text();
        let content = row.get("Content").clean_text();
        let kind = row.get("Type").clean_text();

        // Trailing blank sheet rows produce no events and no warnings.
        if day.is_empty()
            && time.is_empty()
            && venue.is_empty()
            && content.is_empty()
            && kind.is_empty()
        {
            continue;
        }

        let presenters = registry.resolve_list(row.get("Presenters"), report);
        let presenters = (!presenters.is_empty()).then_some(presenters);

        let abstract_text = if kind == "plenary" {
            let text = row.get("Abstract").clean_text();
            (!text.is_empty()).then_some(text)
        } else {
            None
        };

        let mut event = Event {
            day,
            time,
            venue,
            content,
            session_num: None,
            headshot_url: None,
            logo_url: None,
            kind,
            presenters,
            abstract_text,
            affiliation: None,
            films: None,
        };

        // The sheet cannot carry session numbers or affiliations; recover
        // them from the first original event at the same (day, time, venue).
        if let Some(matched) = original.events.iter().find(|candidate| {
            candidate.day == event.day
                && candidate.time == event.time
                && candidate.venue == event.venue
        }) {
            event.session_num = matched.session_num.clone();
            event.affiliation = matched.affiliation.clone();
        }

        events.push(event);
    }

    events
}

/// Drops events whose session reference no longer resolves. Screenings and
/// events without a session number are always kept.
fn drop_orphaned_events(events: &mut Vec<Event>, sessions: &SessionMap, report: &mut Report) {
    events.retain(|event| {
        let Some(session_num) = event.session_num.as_deref() else {
            return true;
        };
        if session_num.is_empty() || sessions.contains(session_num) {
            return true;
        }
        report.warn(format!(
            "Event '{}' ({} @ {} in {}) references missing session {}; event removed.",
            event.content, event.day, event.time, event.venue, session_num
        ));
        false
    });
}

/// Classification of one Screenings row.
enum ScreeningRowKind {
    /// Opens a new slot group; the key is the literal slot cell text.
    Header { key: String },
    Film,
    Other,
}

fn classify_screening_row(row: Row<'_>) -> ScreeningRowKind {
    let slot = row.get("Screening Slot");
    if !slot.is_blank() {
        return ScreeningRowKind::Header {
            key: slot.clean_text(),
        };
    }
    if !row.get("Film Title").is_blank() {
        return ScreeningRowKind::Film;
    }
    ScreeningRowKind::Other
}

fn rebuild_screenings(
    table: &Table,
    registry: &mut Registry,
    report: &mut Report,
) -> BTreeMap<String, Vec<Film>> {
    let mut films_by_slot: BTreeMap<String, Vec<Film>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (index, row) in table.rows().enumerate() {
        match classify_screening_row(row) {
            ScreeningRowKind::Header { key } => {
                // A slot with no film rows still yields an (empty) entry.
                films_by_slot.entry(key.clone()).or_default();
                current = Some(key);
            }
            ScreeningRowKind::Film => {
                let Some(slot) = current.clone() else {
                    report.warn(format!(
                        "Screenings sheet row {}: film '{}' has no preceding screening slot; row dropped.",
                        index + 2,
                        row.get("Film Title").clean_text()
                    ));
                    continue;
                };

                let film = Film {
                    title: row.get("Film Title").clean_text(),
                    year: row.get("Year").clean_number(),
                    duration: row.get("Duration (mins)").clean_number(),
                    creatives: registry.resolve_list(row.get("Creatives"), report),
                };
                films_by_slot.entry(slot).or_default().push(film);
            }
            ScreeningRowKind::Other => {}
        }
    }

    films_by_slot
}

fn attach_films(events: &mut [Event], films_by_slot: &BTreeMap<String, Vec<Film>>) {
    for event in events.iter_mut().filter(|event| event.is_screening()) {
        if let Some(films) = films_by_slot.get(&event.slot_key()) {
            event.films = Some(films.clone());
        }
    }
}
