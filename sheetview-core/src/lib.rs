//! sheetview-core: render spreadsheet checklists as HTML tables
//!
//! A workbook is read from an XLSX file, each worksheet's merged regions are indexed,
//! and every row is turned either into a full-width warning banner or into a list of
//! HTML cells carrying their row and column spans.

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod model;
pub mod reader;
pub mod transform;

use std::path::Path;

pub use cache::ModelCache;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use format::{CellFormatter, LineBreakPolicy};
pub use merge::{MergeIndex, MergeRange, Span};
pub use model::{DocumentModel, RenderedCell, RenderedRow, SheetModel};
pub use transform::SheetOptions;

/// Main rendering interface
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    formatter: CellFormatter,
}

impl Renderer {
    /// Create a renderer with default configuration
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    /// Create a renderer with custom configuration
    pub fn with_config(config: RenderConfig) -> Self {
        let formatter = CellFormatter::new(LineBreakPolicy::from(&config.global));
        Self { config, formatter }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Read a workbook from disk and render it
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentModel> {
        let workbook = reader::read_workbook(path)?;
        self.render_workbook(&workbook)
    }

    /// Render every sheet of an already loaded workbook, in workbook order
    pub fn render_workbook(&self, workbook: &reader::Workbook) -> Result<DocumentModel> {
        let mut sheets = Vec::with_capacity(workbook.sheets.len());

        for sheet in &workbook.sheets {
            if self.config.is_sheet_skipped(&sheet.name, sheet.visible) {
                log::debug!("Skipping sheet '{}'", sheet.name);
                continue;
            }

            let options = self.sheet_options(&sheet.name);
            let model = transform::render_sheet(sheet, &self.formatter, &options)?;
            log::debug!(
                "Rendered sheet '{}': {} row(s), {} column(s), {} warning(s)",
                model.name,
                model.rows.len(),
                model.max_cols,
                model.warning_count()
            );
            sheets.push(model);
        }

        Ok(DocumentModel {
            file_name: workbook.file_name(),
            sheets,
        })
    }

    fn sheet_options(&self, sheet_name: &str) -> SheetOptions {
        SheetOptions {
            exclude_note_column: self.config.exclude_note_column_for(sheet_name),
            strict_warning_rows: self.config.global.strict_warning_rows,
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use crate::reader::{Cell, Font, Sheet, Workbook};
    use std::path::PathBuf;

    fn workbook() -> Workbook {
        let cabin = Sheet::new("Cabin")
            .with_cell(Cell::text(1, 1, "Item"))
            .with_cell(Cell::text(1, 2, "Check"))
            .with_cell(Cell::text(1, 3, "Note"))
            .with_cell(Cell::text(2, 1, "Caution").with_font(Font::bold()))
            .with_merge(MergeRange::new(2, 1, 2, 3));
        let mut hidden = Sheet::new("Scratch").with_cell(Cell::text(1, 1, "tmp"));
        hidden.visible = false;

        Workbook {
            path: PathBuf::from("dir/Checklist.xlsx"),
            sheets: vec![cabin, hidden],
        }
    }

    #[test]
    fn test_render_defaults() {
        let model = Renderer::new().render_workbook(&workbook()).unwrap();
        assert_eq!(model.file_name, "Checklist.xlsx");
        assert_eq!(model.sheets.len(), 2);

        let cabin = &model.sheets[0];
        assert_eq!(cabin.max_cols, 2);
        assert_eq!(cabin.rows[0].cells().len(), 2);
        assert_eq!(
            cabin.rows[1],
            RenderedRow::Warning {
                html: "<strong>Caution</strong>".into()
            }
        );
        // A single-column sheet keeps its only column
        assert_eq!(model.sheets[1].max_cols, 1);
    }

    #[test]
    fn test_sheet_overrides() {
        let mut config = RenderConfig::default();
        config.global.skip_hidden_sheets = true;
        config.sheets.insert(
            "Cabin".into(),
            SheetConfig {
                exclude_note_column: Some(false),
                skip: false,
            },
        );

        let model = Renderer::with_config(config)
            .render_workbook(&workbook())
            .unwrap();
        assert_eq!(model.sheets.len(), 1);
        assert_eq!(model.sheets[0].max_cols, 3);
        assert_eq!(model.sheets[0].rows[0].cells()[2].html, "Note");
    }

    #[test]
    fn test_line_break_policy_from_config() {
        let mut config = RenderConfig::default();
        config.global.collapse_max_segments = 1;
        let book = Workbook {
            path: PathBuf::from("a.xlsx"),
            sheets: vec![Sheet::new("S").with_cell(Cell::text(1, 1, "Jane\nDoe"))],
        };

        let model = Renderer::with_config(config)
            .render_workbook(&book)
            .unwrap();
        assert_eq!(model.sheets[0].rows[0].cells()[0].html, "Jane<br>Doe");
    }
}
