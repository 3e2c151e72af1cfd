use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::error::Result;
use crate::flatten::{SheetTable, WorkbookData};

/// Writes the provided workbook data to the given path.
///
/// Styling follows the conventions the editors expect: bold white headers
/// on the per-sheet fill colour, frozen header row, autofilter, wrapped
/// top-aligned body cells and column widths clamped to a readable range.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(table.header_fill))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();
        let body_format = Format::new().set_align(FormatAlign::Top).set_text_wrap();

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet.write_string_with_format(
                    (row_idx + 1) as u32,
                    col_idx as u16,
                    cell,
                    &body_format,
                )?;
            }
        }

        for (col_idx, width) in column_widths(table).into_iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, width)?;
        }

        worksheet.set_row_height(0, 30)?;
        worksheet.set_freeze_panes(1, 0)?;

        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len() as u32;
        worksheet.autofilter(0, 0, row_end, col_end)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn column_widths(table: &SheetTable) -> Vec<f64> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .map(String::len)
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0);
            (longest + 2).clamp(12, 60) as f64
        })
        .collect()
}
