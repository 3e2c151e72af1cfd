mod common;

use confsync::reconcile::reconcile;
use confsync::table::Cell;
use serde_json::json;

#[test]
fn session_headers_group_following_paper_rows() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![
        common::text_row(&["SESSION 1", "panel", "Archival Futures", "", "", ""]),
        common::text_row(&["", "paper", "Paper A", "", "", ""]),
        common::text_row(&["", "paper", "Paper B", "", "", ""]),
        common::text_row(&["SESSION 2", "roundtable", "Open Forum", "", "", ""]),
        common::text_row(&["", "paper", "Paper C", "", "", ""]),
    ]);

    let (document, report) = reconcile(&original, &sheets);

    assert_eq!(document.sessions.len(), 2);
    let first = document.sessions.get("1").expect("session 1");
    assert_eq!(first.title, "Archival Futures");
    assert_eq!(first.papers.len(), 2);
    assert_eq!(first.papers[0].title, "Paper A");
    assert_eq!(first.papers[1].title, "Paper B");
    let second = document.sessions.get("2").expect("session 2");
    assert_eq!(second.papers.len(), 1);
    assert_eq!(second.papers[0].title, "Paper C");
    assert!(report.warnings().is_empty());
}

#[test]
fn paper_row_before_any_header_is_dropped_with_warning() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "", "paper", "Orphan Paper", "", "Jane Doe", "",
    ])]);

    let (document, report) = reconcile(&original, &sheets);

    assert!(document.sessions.is_empty());
    assert_eq!(report.warnings().len(), 1);
    assert!(report.warnings()[0].contains("Orphan Paper"));
    // The orphan row's names are never resolved, so nothing gets registered.
    assert!(report.new_participants().is_empty());
}

#[test]
fn fully_blank_event_rows_are_suppressed_silently() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![
        common::text_row(&["", "", "", "", "", "", ""]),
        vec![
            Cell::Empty,
            Cell::Number(f64::NAN),
            Cell::Text("  ".to_string()),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ],
    ]);

    let (document, report) = reconcile(&original, &sheets);

    assert!(document.events.is_empty());
    assert!(report.warnings().is_empty());
}

#[test]
fn event_referencing_removed_session_is_dropped_with_one_warning() {
    let original = common::document(json!({
        "events": [{
            "day": "Friday", "time": "1000", "venue": "Main Hall",
            "content": "Lost Panel", "session_num": "5", "type": "panel"
        }]
    }));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![common::text_row(&[
        "Friday", "1000", "Main Hall", "panel", "Lost Panel", "", "",
    ])]);

    let (document, report) = reconcile(&original, &sheets);

    assert!(document.events.is_empty());
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(
        report.warnings()[0],
        "Event 'Lost Panel' (Friday @ 1000 in Main Hall) references missing session 5; event removed."
    );
}

#[test]
fn cross_reference_recovers_session_number_and_affiliation() {
    let original = common::document(json!({
        "events": [{
            "day": "Friday", "time": "1100", "venue": "Main Hall",
            "content": "Panel", "session_num": "1", "affiliation": "Uppsala University",
            "type": "panel"
        }]
    }));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1", "panel", "Archival Futures", "", "", "",
    ])]);
    sheets.events = common::events_table(vec![common::text_row(&[
        "Friday", "1100", "Main Hall", "panel", "Renamed Panel", "", "",
    ])]);

    let (document, _) = reconcile(&original, &sheets);

    assert_eq!(document.events.len(), 1);
    let event = &document.events[0];
    assert_eq!(event.content, "Renamed Panel");
    assert_eq!(event.session_num.as_deref(), Some("1"));
    assert_eq!(event.affiliation, Some(json!("Uppsala University")));
}

#[test]
fn registry_wins_over_inline_annotation_in_detail_sheets() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.participants = common::participants_table(vec![common::text_row(&["Jane Doe", "MIT"])]);
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1",
        "panel",
        "Archival Futures",
        "",
        "Jane Doe (Harvard)",
        "",
    ])]);

    let (document, report) = reconcile(&original, &sheets);

    let session = document.sessions.get("1").expect("session 1");
    assert_eq!(session.presenters.len(), 1);
    assert_eq!(session.presenters[0].institution.as_deref(), Some("MIT"));
    assert!(report.new_participants().is_empty());
}

#[test]
fn inline_declarations_register_new_participants() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1",
        "panel",
        "Archival Futures",
        "",
        "John Smith (Oxford); Anon Person",
        "",
    ])]);

    let (document, report) = reconcile(&original, &sheets);

    let session = document.sessions.get("1").expect("session 1");
    assert_eq!(session.presenters.len(), 2);
    assert_eq!(session.presenters[0].institution.as_deref(), Some("Oxford"));
    assert_eq!(session.presenters[1].institution, None);
    assert_eq!(report.new_participants().len(), 2);
    assert_eq!(
        report.missing_institutions().collect::<Vec<_>>(),
        vec!["Anon Person"]
    );
}

#[test]
fn new_names_persist_across_later_sheets() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1",
        "panel",
        "Archival Futures",
        "",
        "John Smith (Oxford)",
        "",
    ])]);
    sheets.screenings = common::screenings_table(vec![
        common::text_row(&["Friday - 1400 - Cinema Room", "", "", "", ""]),
        common::text_row(&["", "Harbour Lights", "2019", "24", "John Smith"]),
    ]);

    let (_, report) = reconcile(&original, &sheets);

    // The screenings sheet sees the registration made by the sessions sheet.
    assert_eq!(report.new_participants().len(), 1);
}

#[test]
fn blank_participant_names_warn_and_are_skipped() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.participants = common::participants_table(vec![
        common::text_row(&["", "Ghost Institute"]),
        common::text_row(&["Jane Doe", "MIT"]),
    ]);

    let (_, report) = reconcile(&original, &sheets);

    assert_eq!(report.warnings().len(), 1);
    assert!(report.warnings()[0].contains("row 2"));
    assert!(report.warnings()[0].contains("blank Name"));
}

#[test]
fn later_duplicate_participant_row_wins() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.participants = common::participants_table(vec![
        common::text_row(&["Jane Doe", "MIT"]),
        common::text_row(&["Jane Doe", "Harvard"]),
    ]);
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1", "panel", "Archival Futures", "", "Jane Doe", "",
    ])]);

    let (document, _) = reconcile(&original, &sheets);

    let session = document.sessions.get("1").expect("session 1");
    assert_eq!(session.presenters[0].institution.as_deref(), Some("Harvard"));
}

#[test]
fn screening_slots_group_their_film_rows() {
    let original = common::document(json!({
        "events": [{
            "day": "Friday", "time": "1400", "venue": "Cinema Room",
            "content": "Documentary Shorts", "type": "screening"
        }]
    }));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![common::text_row(&[
        "Friday",
        "1400",
        "Cinema Room",
        "screening",
        "Documentary Shorts",
        "",
        "",
    ])]);
    sheets.screenings = common::screenings_table(vec![
        common::text_row(&["Friday - 1400 - Cinema Room", "", "", "", ""]),
        common::text_row(&["", "Harbour Lights", "2019", "24", "Tomas Eriksson"]),
        vec![
            Cell::Empty,
            Cell::Text("Northern Passage".to_string()),
            Cell::Number(2021.0),
            Cell::Empty,
            Cell::Empty,
        ],
    ]);

    let (document, _) = reconcile(&original, &sheets);

    let films = document.events[0].films.as_deref().expect("films attached");
    assert_eq!(films.len(), 2);
    assert_eq!(films[0].title, "Harbour Lights");
    assert_eq!(films[0].year, Some(2019));
    assert_eq!(films[0].duration, Some(24));
    assert_eq!(films[1].year, Some(2021));
    assert_eq!(films[1].duration, None);
    assert!(films[1].creatives.is_empty());
}

#[test]
fn film_row_before_any_slot_is_dropped_with_warning() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.screenings = common::screenings_table(vec![common::text_row(&[
        "",
        "Orphan Film",
        "2020",
        "90",
        "Someone New",
    ])]);

    let (_, report) = reconcile(&original, &sheets);

    assert_eq!(report.warnings().len(), 1);
    assert!(report.warnings()[0].contains("Orphan Film"));
    assert!(report.new_participants().is_empty());
}

#[test]
fn screening_event_with_empty_slot_keeps_an_empty_film_list() {
    let original = common::document(json!({
        "events": [{
            "day": "Friday", "time": "1400", "venue": "Cinema Room",
            "content": "Documentary Shorts", "type": "screening"
        }]
    }));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![common::text_row(&[
        "Friday",
        "1400",
        "Cinema Room",
        "screening",
        "Documentary Shorts",
        "",
        "",
    ])]);
    sheets.screenings = common::screenings_table(vec![common::text_row(&[
        "Friday - 1400 - Cinema Room",
        "",
        "",
        "",
        "",
    ])]);

    let (document, _) = reconcile(&original, &sheets);

    assert_eq!(document.events[0].films.as_deref(), Some(&[][..]));
}

#[test]
fn blank_session_description_falls_back_to_stored_panel_description() {
    let original = common::document(json!({
        "panel_descriptions": {"1": "How archives shape memory."}
    }));
    let mut sheets = common::empty_sheets();
    sheets.sessions = common::sessions_table(vec![common::text_row(&[
        "SESSION 1", "panel", "Archival Futures", "", "", "",
    ])]);

    let (document, _) = reconcile(&original, &sheets);

    let session = document.sessions.get("1").expect("session 1");
    assert_eq!(session.description, "How archives shape memory.");
    assert_eq!(
        document.panel_descriptions.get("1").map(String::as_str),
        Some("How archives shape memory.")
    );
}

#[test]
fn event_times_are_canonicalised_from_numeric_cells() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![vec![
        Cell::Text("Friday".to_string()),
        Cell::Number(930.0),
        Cell::Text("Main Hall".to_string()),
        Cell::Text("plenary".to_string()),
        Cell::Text("Opening".to_string()),
        Cell::Empty,
        Cell::Empty,
    ]]);

    let (document, _) = reconcile(&original, &sheets);

    assert_eq!(document.events[0].time, "0930");
}

#[test]
fn plenary_abstract_is_kept_and_other_types_ignore_the_column() {
    let original = common::document(json!({}));
    let mut sheets = common::empty_sheets();
    sheets.events = common::events_table(vec![
        common::text_row(&[
            "Friday",
            "0900",
            "Main Hall",
            "plenary",
            "Opening",
            "Maria Lindqvist (Uppsala University)",
            "Keynote on archives.",
        ]),
        common::text_row(&[
            "Friday", "1100", "Main Hall", "panel", "Panel", "", "Stray text",
        ]),
    ]);

    let (document, _) = reconcile(&original, &sheets);

    assert_eq!(
        document.events[0].abstract_text.as_deref(),
        Some("Keynote on archives.")
    );
    assert_eq!(document.events[1].abstract_text, None);
}
