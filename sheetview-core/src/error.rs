//! Error types for sheetview

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheetview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or rendering a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// The workbook file does not exist.
    #[error("Workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a readable zip container.
    #[error("Invalid workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error parsing one of the workbook XML parts.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The file extension is not one of the supported OOXML formats.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A part required to interpret the workbook is missing.
    #[error("Missing workbook part: {0}")]
    MissingPart(String),

    /// The TOML configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// More than one banner merge starts on the same row.
    #[error("Row {row} of sheet '{sheet}' has {count} warning merges")]
    AmbiguousWarningRow {
        sheet: String,
        row: u32,
        count: usize,
    },
}
