//! XML parsing of the XLSX parts needed to render a workbook

use std::collections::HashMap;
use std::io::{BufRead, BufReader};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::parser_utils::{
    attr_value, parse_cell_range, parse_cell_ref, read_text_node, skip_element, toggle_value,
};
use super::styles::{StyleTable, color_from_attributes, parse_styles};
use super::workbook::{Cell, CellContent, CellValue, Font, Sheet, TextRun};
use crate::error::{Error, Result};
use crate::merge::MergeRange;

/// A `<sheet>` entry of `xl/workbook.xml`, resolved to its part path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub path: String,
    pub visible: bool,
}

/// A shared or inline string item (`<si>` / `<is>`)
#[derive(Debug, Clone, PartialEq)]
pub enum StringItem {
    Plain(String),
    Rich(Vec<TextRun>),
}

impl StringItem {
    fn into_content(self) -> CellContent {
        match self {
            StringItem::Plain(text) => CellContent::Value(CellValue::Text(text)),
            StringItem::Rich(runs) => CellContent::Rich(runs),
        }
    }
}

pub struct XlsxReader<'a, R: std::io::Read + std::io::Seek> {
    archive: &'a mut ZipArchive<R>,
    shared_strings: Vec<StringItem>,
    styles: StyleTable,
}

impl<'a, R: std::io::Read + std::io::Seek> XlsxReader<'a, R> {
    pub fn new(archive: &'a mut ZipArchive<R>) -> Result<Self> {
        let shared_strings = extract_shared_strings(archive)?;
        let styles = parse_styles(archive)?;
        Ok(Self {
            archive,
            shared_strings,
            styles,
        })
    }

    /// Parse every worksheet in workbook order
    pub fn read_sheets(&mut self) -> Result<Vec<Sheet>> {
        let entries = self.sheet_entries()?;
        let mut sheets = Vec::with_capacity(entries.len());

        for entry in entries {
            let mut sheet = Sheet::new(entry.name.clone());
            sheet.visible = entry.visible;
            self.parse_sheet_xml(&entry.path, &mut sheet)?;

            log::debug!(
                "Parsed sheet '{}' from {}: {} cells, {} merges, extent {}x{}",
                sheet.name,
                entry.path,
                sheet.cells.len(),
                sheet.merged_cells.len(),
                sheet.max_row,
                sheet.max_col
            );
            sheets.push(sheet);
        }

        Ok(sheets)
    }

    /// List sheets with their part paths and visibility
    pub fn sheet_entries(&mut self) -> Result<Vec<SheetEntry>> {
        let rels = extract_workbook_relationships(self.archive)?;

        let workbook_xml = self
            .archive
            .by_name("xl/workbook.xml")
            .map_err(|_| Error::MissingPart("xl/workbook.xml".to_string()))?;
        let mut reader = Reader::from_reader(BufReader::new(workbook_xml));
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut r_id = String::new();
                    let mut state = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = attr.unescape_value()?.to_string(),
                            b"r:id" => r_id = attr.unescape_value()?.to_string(),
                            b"state" => state = attr.unescape_value()?.to_string(),
                            _ => {}
                        }
                    }

                    let path = match rels.get(&r_id) {
                        Some(target) => resolve_target(target),
                        None => format!("xl/worksheets/sheet{}.xml", entries.len() + 1),
                    };
                    entries.push(SheetEntry {
                        name,
                        path,
                        visible: state != "hidden" && state != "veryHidden",
                    });
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(entries)
    }

    fn parse_sheet_xml(&mut self, path: &str, sheet: &mut Sheet) -> Result<()> {
        let sheet_xml = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingPart(path.to_string()))?;
        let mut reader = Reader::from_reader(BufReader::new(sheet_xml));

        let mut buf = Vec::new();
        let mut current_row = 0u32;
        let mut current_col = 0u32;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => match e.name().as_ref() {
                    b"row" => {
                        current_row = attr_value(e, b"r")
                            .and_then(|r| r.parse::<u32>().ok())
                            .unwrap_or(current_row + 1);
                        current_col = 0;
                    }
                    b"c" => {
                        let (row, col) = attr_value(e, b"r")
                            .and_then(|r| parse_cell_ref(&r))
                            .unwrap_or((current_row.max(1), current_col + 1));
                        current_col = col;

                        let style = attr_value(e, b"s").and_then(|s| s.parse::<usize>().ok());
                        let cell_type = attr_value(e, b"t").unwrap_or_default();

                        let content = if let Event::Start(_) = event {
                            parse_cell_contents(&mut reader, &cell_type, &self.shared_strings)?
                        } else {
                            CellContent::Empty
                        };

                        let font = style
                            .and_then(|idx| self.styles.font_for(idx))
                            .cloned()
                            .unwrap_or_default();

                        if content.is_empty() && font == Font::default() {
                            // Style-only cells still count toward the used range
                            sheet.extend_to(row, col);
                        } else {
                            sheet.insert_cell(Cell::new(row, col, content).with_font(font));
                        }
                    }
                    b"mergeCell" => {
                        if let Some(reference) = attr_value(e, b"ref") {
                            match parse_cell_range(&reference) {
                                Some((r1, c1, r2, c2)) => {
                                    sheet.add_merge(MergeRange::new(r1, c1, r2, c2))
                                }
                                None => log::warn!(
                                    "Ignoring unreadable merge '{}' in sheet '{}'",
                                    reference,
                                    sheet.name
                                ),
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

/// Map relationship ids to targets from `xl/_rels/workbook.xml.rels`
fn extract_workbook_relationships(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
) -> Result<HashMap<String, String>> {
    let mut rels = HashMap::new();
    let rels_xml = match archive.by_name("xl/_rels/workbook.xml.rels") {
        Ok(file) => file,
        Err(_) => return Ok(rels),
    };

    let mut reader = Reader::from_reader(BufReader::new(rels_xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Relationship targets are relative to `xl/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

/// Read the content of a `<c>` element up to its closing tag
fn parse_cell_contents<R: BufRead>(
    reader: &mut Reader<R>,
    cell_type: &str,
    shared_strings: &[StringItem],
) -> Result<CellContent> {
    let mut content = CellContent::Empty;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"v" => {
                    let v_text = read_text_node(reader)?;
                    content = value_content(cell_type, v_text, shared_strings);
                }
                b"is" => {
                    content = parse_string_item(reader, b"is")?.into_content();
                }
                b"f" => {
                    // Cached values are rendered, formulas are not
                    skip_element(reader, b"f")?;
                }
                _ => {}
            },
            Event::End(ref e) if e.name().as_ref() == b"c" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(content)
}

fn value_content(
    cell_type: &str,
    v_text: String,
    shared_strings: &[StringItem],
) -> CellContent {
    match cell_type {
        "s" => {
            let index = v_text.trim().parse::<usize>().ok();
            match index.and_then(|idx| shared_strings.get(idx)) {
                Some(item) => item.clone().into_content(),
                None => {
                    log::warn!("Shared string index '{}' out of range", v_text);
                    CellContent::Empty
                }
            }
        }
        "b" => CellContent::Value(CellValue::Boolean(v_text.trim() == "1")),
        "e" => CellContent::Value(CellValue::Error(v_text)),
        "str" | "inlineStr" | "d" => CellContent::Value(CellValue::Text(v_text)),
        _ => match parse_number(v_text.trim()) {
            Some(value) => CellContent::Value(value),
            None if v_text.is_empty() => CellContent::Empty,
            None => CellContent::Value(CellValue::Text(v_text)),
        },
    }
}

/// Literals with a decimal point or exponent are floats, anything else an exact integer
fn parse_number(text: &str) -> Option<CellValue> {
    if !text.contains(['.', 'e', 'E'])
        && let Ok(n) = text.parse::<i128>()
    {
        return Some(CellValue::Integer(n));
    }
    text.parse::<f64>().ok().map(CellValue::Number)
}

/// Parse all `<si>` items of `xl/sharedStrings.xml`
pub fn extract_shared_strings(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
) -> Result<Vec<StringItem>> {
    let mut strings = Vec::new();
    let ss_xml = match archive.by_name("xl/sharedStrings.xml") {
        Ok(file) => file,
        Err(_) => return Ok(strings),
    };

    let mut reader = Reader::from_reader(BufReader::new(ss_xml));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"si" => {
                strings.push(parse_string_item(&mut reader, b"si")?);
            }
            Event::Empty(e) if e.name().as_ref() == b"si" => {
                strings.push(StringItem::Plain(String::new()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("Parsed {} shared strings", strings.len());
    Ok(strings)
}

/// Run-level pieces collected while reading a string item
#[derive(Default)]
struct PendingRun {
    text: Option<String>,
    font: Font,
}

/// Parse the body of an `<si>` or `<is>` element, up to its closing tag.
///
/// Items with at least one styled `<r>` run become rich text. A run without a `<t>` element
/// makes the item malformed, and it falls back to its flattened plain text.
fn parse_string_item<R: BufRead>(reader: &mut Reader<R>, end: &[u8]) -> Result<StringItem> {
    let mut buf = Vec::new();
    let mut plain = String::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut pending: Option<PendingRun> = None;
    let mut in_rpr = false;
    let mut malformed = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                match e.name().as_ref() {
                    b"r" if is_start => pending = Some(PendingRun::default()),
                    b"rPr" if is_start => in_rpr = true,
                    b"rPh" if is_start => skip_element(reader, b"rPh")?,
                    b"b" if in_rpr => {
                        if let Some(run) = pending.as_mut() {
                            run.font.bold = toggle_value(e);
                        }
                    }
                    b"color" if in_rpr => {
                        if let Some(run) = pending.as_mut() {
                            run.font.color = color_from_attributes(e);
                        }
                    }
                    b"t" => {
                        let text = if is_start {
                            read_text_node(reader)?
                        } else {
                            String::new()
                        };
                        plain.push_str(&text);
                        match pending.as_mut() {
                            Some(run) => run.text.get_or_insert_with(String::new).push_str(&text),
                            None if !text.is_empty() => runs.push(TextRun::plain(text)),
                            None => {}
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"rPr" => in_rpr = false,
                b"r" => {
                    if let Some(run) = pending.take() {
                        match run.text {
                            Some(text) => runs.push(TextRun::new(text, run.font)),
                            None => malformed = true,
                        }
                    }
                }
                name if name == end => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let has_styled_run = runs.iter().any(|run| run.font != Font::default());
    if malformed {
        log::warn!(
            "Malformed rich text run, falling back to plain text: {:?}",
            plain
        );
        return Ok(StringItem::Plain(plain));
    }
    if has_styled_run {
        Ok(StringItem::Rich(runs))
    } else {
        Ok(StringItem::Plain(plain))
    }
}
