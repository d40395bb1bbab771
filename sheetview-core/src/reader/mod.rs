//! XLSX workbook reader using custom XML parsers

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

pub mod parser_utils;
pub mod styles;
pub mod workbook;
pub mod xlsx_parser;

use self::xlsx_parser::XlsxReader;
pub use workbook::{Cell, CellContent, CellValue, Font, Sheet, TextRun, Workbook};

/// Read a workbook from a file path.
///
/// The file handle is released before this returns, whether parsing succeeded or not.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path_ref = path.as_ref();

    let file = match File::open(path_ref) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::NotFound(path_ref.to_path_buf()));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let is_xlsx = path_ref
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("xlsx") || s.eq_ignore_ascii_case("xlsm"))
        .unwrap_or(false);
    if !is_xlsx {
        return Err(Error::UnsupportedFormat(path_ref.display().to_string()));
    }

    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let sheets = XlsxReader::new(&mut archive)?.read_sheets()?;

    log::debug!(
        "Read workbook {} with {} sheet(s)",
        path_ref.display(),
        sheets.len()
    );

    Ok(Workbook {
        path: path_ref.to_path_buf(),
        sheets,
    })
}
