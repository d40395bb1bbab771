//! Presentation model handed to renderers

use serde::{Deserialize, Serialize};

/// A rendered workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentModel {
    pub file_name: String,
    pub sheets: Vec<SheetModel>,
}

/// A rendered worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetModel {
    pub name: String,
    /// Number of table columns, after any Note column exclusion
    pub max_cols: u32,
    pub rows: Vec<RenderedRow>,
}

impl SheetModel {
    pub fn warning_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_warning()).count()
    }
}

/// A table row: either a full-width banner or ordinary cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderedRow {
    Warning { html: String },
    Data { cells: Vec<RenderedCell> },
}

impl RenderedRow {
    pub fn is_warning(&self) -> bool {
        matches!(self, RenderedRow::Warning { .. })
    }

    /// Cells of a data row; empty for a warning row
    pub fn cells(&self) -> &[RenderedCell] {
        match self {
            RenderedRow::Warning { .. } => &[],
            RenderedRow::Data { cells } => cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub html: String,
    pub rowspan: u32,
    pub colspan: u32,
}

impl RenderedCell {
    pub fn new(html: impl Into<String>, rowspan: u32, colspan: u32) -> Self {
        Self {
            html: html.into(),
            rowspan,
            colspan,
        }
    }
}
