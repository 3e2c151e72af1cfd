use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::flatten::build_workbook;
use crate::io::{excel_read, excel_write, json};
use crate::reconcile;
use crate::registry::Registry;
use crate::report::Report;

/// Counts reported after an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub participants: usize,
    pub sessions: usize,
    pub papers: usize,
    pub events: usize,
    pub screening_slots: usize,
}

/// Flattens the programme JSON into the editable workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn json_to_excel(input: &Path, output: &Path) -> Result<ExportSummary> {
    let document = json::read_document(input)?;
    let workbook = build_workbook(&document);
    debug!(sheet_count = workbook.tables.len(), "workbook constructed");
    excel_write::write_workbook(output, &workbook)?;

    let summary = ExportSummary {
        participants: Registry::from_document(&document).len(),
        sessions: document.sessions.len(),
        papers: document.sessions.paper_count(),
        events: document.events.len(),
        screening_slots: document.screening_count(),
    };
    info!(
        participants = summary.participants,
        sessions = summary.sessions,
        papers = summary.papers,
        events = summary.events,
        screening_slots = summary.screening_slots,
        "export complete"
    );
    Ok(summary)
}

/// Reconciles an edited workbook back into the programme JSON.
///
/// The original document supplies the fields the workbook cannot carry
/// (session numbers, affiliations, passthrough sections). The returned
/// report collects everything worth surfacing to the operator; warnings
/// never abort the run.
#[instrument(
    level = "info",
    skip_all,
    fields(
        workbook = %workbook_path.display(),
        original = %original_path.display(),
        output = %output.display()
    )
)]
pub fn excel_to_json(workbook_path: &Path, original_path: &Path, output: &Path) -> Result<Report> {
    let original = json::read_document(original_path)?;
    let sheets = excel_read::read_sheets(workbook_path)?;
    debug!(
        participant_rows = sheets.participants.rows.len(),
        session_rows = sheets.sessions.rows.len(),
        event_rows = sheets.events.rows.len(),
        screening_rows = sheets.screenings.rows.len(),
        "workbook read"
    );

    let (document, report) = reconcile::reconcile(&original, &sheets);
    info!(
        new_participants = report.new_participants().len(),
        sessions = document.sessions.len(),
        papers = document.sessions.paper_count(),
        events = document.events.len(),
        films = document.film_count(),
        warnings = report.warnings().len(),
        "reconciliation complete"
    );

    json::write_document(output, &document)?;
    Ok(report)
}
