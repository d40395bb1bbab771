//! Workbook data structures

use crate::merge::MergeRange;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// File name component of the source path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Represents a worksheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Cells keyed by 1-based (row, col)
    pub cells: HashMap<(u32, u32), Cell>,
    /// Merged cell ranges in declaration order
    pub merged_cells: Vec<MergeRange>,
    /// Last used row, 1-based inclusive (0 when the sheet is empty)
    pub max_row: u32,
    /// Last used column, 1-based inclusive (0 when the sheet is empty)
    pub max_col: u32,
    pub visible: bool,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            merged_cells: Vec::new(),
            max_row: 0,
            max_col: 0,
            visible: true,
        }
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Insert a cell, growing the sheet extent to include it
    pub fn insert_cell(&mut self, cell: Cell) {
        self.extend_to(cell.row, cell.col);
        self.cells.insert((cell.row, cell.col), cell);
    }

    /// Record a merge declaration, growing the sheet extent to include it
    pub fn add_merge(&mut self, range: MergeRange) {
        self.extend_to(range.max_row, range.max_col);
        self.merged_cells.push(range);
    }

    /// Grow the extent so that (row, col) lies inside it
    pub fn extend_to(&mut self, row: u32, col: u32) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
    }

    /// Builder-style helper used when assembling sheets by hand
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.insert_cell(cell);
        self
    }

    /// Builder-style helper used when assembling sheets by hand
    pub fn with_merge(mut self, range: MergeRange) -> Self {
        self.add_merge(range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.max_row == 0 || self.max_col == 0
    }
}

/// Font attributes relevant to rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    pub bold: bool,
    /// Resolved ARGB hex string (e.g. "FFFF0000"), if the colour could be resolved
    pub color: Option<String>,
}

impl Font {
    pub fn bold() -> Self {
        Self {
            bold: true,
            color: None,
        }
    }

    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            bold: false,
            color: Some(color.into()),
        }
    }
}

/// One independently styled segment of a rich-text cell
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Font::default())
    }
}

/// Represents a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub content: CellContent,
    /// Cell-level font; rich runs carry their own
    pub font: Font,
}

impl Cell {
    pub fn new(row: u32, col: u32, content: CellContent) -> Self {
        Self {
            row,
            col,
            content,
            font: Font::default(),
        }
    }

    /// Plain text cell with the default font
    pub fn text(row: u32, col: u32, text: impl Into<String>) -> Self {
        Self::new(row, col, CellContent::Value(CellValue::Text(text.into())))
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }
}

/// What a cell holds
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    #[default]
    Empty,
    /// A single uniformly styled value
    Value(CellValue),
    /// Multiple styled runs
    Rich(Vec<TextRun>),
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Text of the content with run styling dropped
    pub fn flattened_text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Value(value) => value.to_string(),
            CellContent::Rich(runs) => runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    /// Numeric literal without a fraction or exponent, kept exact
    Integer(i128),
    Number(f64),
    Boolean(bool),
    /// Cached error value of a formula (e.g. "#N/A")
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Number(n) => write_float(f, *n),
            CellValue::Boolean(true) => f.write_str("True"),
            CellValue::Boolean(false) => f.write_str("False"),
            CellValue::Error(err) => f.write_str(err),
        }
    }
}

/// Whole values print without a fraction; very small or very large magnitudes use
/// a signed two-digit exponent (`1e-05`, `1.5e+16`)
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        return write!(f, "{}", n as i64);
    }

    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{}", n);
    };
    match exponent.parse::<i32>() {
        Ok(exp) if !(-4..16).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
        }
        _ => write!(f, "{}", n),
    }
}
