//! In-memory tabular representation shared by the workbook reader and the
//! reconciliation core.
//!
//! Every cell read in the crate goes through the coercions defined here:
//! one blank predicate, one text cleaner, one number cleaner and one time
//! canonicaliser. Spreadsheet cells arrive as strings, floats, booleans or
//! blanks interchangeably depending on how the workbook was edited, so the
//! coercions are the only sanctioned way to look at a cell.

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// True for empty cells, NaN numbers and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(value) => value.is_nan(),
            Cell::Text(value) => value.trim().is_empty(),
            Cell::Bool(_) => false,
        }
    }

    /// Trimmed textual content, empty string for blank cells.
    pub fn clean_text(&self) -> String {
        if self.is_blank() {
            return String::new();
        }
        match self {
            Cell::Text(value) => value.trim().to_string(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Integer content, if any. Numeric cells truncate; textual cells parse
    /// as integers or floats. Anything else is `None`.
    pub fn clean_number(&self) -> Option<i64> {
        match self {
            Cell::Number(value) if !value.is_nan() => Some(*value as i64),
            Cell::Text(value) => {
                let trimmed = value.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|parsed| parsed as i64))
            }
            _ => None,
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Canonicalises a timetable time cell to a 4-digit zero-padded string.
///
/// Numeric cells render their integer part zero-padded (`930` → `"0930"`);
/// short digit strings are zero-padded; any other text passes through
/// unchanged (`"TBD"` stays `"TBD"`).
pub fn format_time(cell: &Cell) -> String {
    if cell.is_blank() {
        return String::new();
    }
    if let Cell::Number(value) = cell {
        return format!("{:04}", *value as i64);
    }
    let text = cell.clean_text();
    if !text.is_empty() && text.len() <= 4 && text.bytes().all(|byte| byte.is_ascii_digit()) {
        return format!("{text:0>4}");
    }
    text
}

/// A sheet read into memory: a header row plus data rows. Cells are
/// addressed by column header, so reordered spreadsheet columns still
/// resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Iterates the data rows as header-addressable views.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { table: self, cells })
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|header| header == column)
    }
}

/// A borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl Row<'_> {
    /// Returns the cell under the named column, or an empty cell when the
    /// column or the cell is missing.
    pub fn get(&self, column: &str) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.table
            .column_index(column)
            .and_then(|index| self.cells.get(index))
            .unwrap_or(&EMPTY)
    }
}

/// The four fixed sheets the reconciler consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSet {
    pub participants: Table,
    pub sessions: Table,
    pub events: Table,
    pub screenings: Table,
}
