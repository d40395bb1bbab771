//! Worksheet to row/cell model transformation

use crate::error::{Error, Result};
use crate::format::CellFormatter;
use crate::merge::{MergeIndex, Span};
use crate::model::{RenderedCell, RenderedRow, SheetModel};
use crate::reader::Sheet;
use crate::reader::parser_utils::cell_ref;

/// Per-sheet transformation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    /// Leave the last column (the Note column) out of the table
    pub exclude_note_column: bool,
    /// Fail when several banner merges start on one row
    pub strict_warning_rows: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            exclude_note_column: true,
            strict_warning_rows: false,
        }
    }
}

/// Number of columns rendered for a sheet whose last used column is `max_col`
pub fn rendered_column_count(max_col: u32, exclude_note_column: bool) -> u32 {
    if exclude_note_column && max_col > 1 {
        max_col - 1
    } else {
        max_col
    }
}

/// Render one worksheet into its presentation model
pub fn render_sheet(
    sheet: &Sheet,
    formatter: &CellFormatter,
    options: &SheetOptions,
) -> Result<SheetModel> {
    let merges = MergeIndex::build(&sheet.merged_cells);
    log::debug!(
        "Sheet '{}': {} merge(s) covering {} cell(s)",
        sheet.name,
        merges.len(),
        merges.covered_count()
    );
    let rows = transform_sheet(sheet, &merges, formatter, options)?;

    Ok(SheetModel {
        name: sheet.name.clone(),
        max_cols: rendered_column_count(sheet.max_col, options.exclude_note_column),
        rows,
    })
}

/// Walk the sheet row by row, emitting warning banners and data rows
pub fn transform_sheet(
    sheet: &Sheet,
    merges: &MergeIndex,
    formatter: &CellFormatter,
    options: &SheetOptions,
) -> Result<Vec<RenderedRow>> {
    let max_col = rendered_column_count(sheet.max_col, options.exclude_note_column);
    let mut rows = Vec::with_capacity(sheet.max_row as usize);

    for row in 1..=sheet.max_row {
        match warning_origin(sheet, merges, row, options)? {
            Some(col) => rows.push(RenderedRow::Warning {
                html: formatter.format(sheet.get_cell(row, col)),
            }),
            None => rows.push(RenderedRow::Data {
                cells: transform_row(sheet, merges, formatter, row, max_col),
            }),
        }
    }

    Ok(rows)
}

/// Column of the banner merge starting on `row`, if the row is a warning row
fn warning_origin(
    sheet: &Sheet,
    merges: &MergeIndex,
    row: u32,
    options: &SheetOptions,
) -> Result<Option<u32>> {
    let origins = merges.warning_origins(row);
    if origins.len() > 1 {
        if options.strict_warning_rows {
            return Err(Error::AmbiguousWarningRow {
                sheet: sheet.name.clone(),
                row,
                count: origins.len(),
            });
        }
        log::warn!(
            "Sheet '{}' row {} has {} warning merges, using {}",
            sheet.name,
            row,
            origins.len(),
            cell_ref(row, origins[0].0)
        );
    }
    Ok(origins.first().map(|(col, _)| *col))
}

fn transform_row(
    sheet: &Sheet,
    merges: &MergeIndex,
    formatter: &CellFormatter,
    row: u32,
    max_col: u32,
) -> Vec<RenderedCell> {
    let mut cells = Vec::new();
    let mut col = 1;

    while col <= max_col {
        if merges.is_covered(row, col) {
            match merges.span_at(row, col) {
                Some(Span { rowspan, colspan }) => {
                    // Merges reaching into the excluded Note column stop at the boundary
                    let colspan = colspan.min(max_col - col + 1);
                    cells.push(RenderedCell::new(
                        formatter.format(sheet.get_cell(row, col)),
                        rowspan,
                        colspan,
                    ));
                    col += colspan;
                }
                None => col += 1,
            }
        } else {
            cells.push(RenderedCell::new(
                formatter.format(sheet.get_cell(row, col)),
                1,
                1,
            ));
            col += 1;
        }
    }

    cells
}
