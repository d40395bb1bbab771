//! Font extraction from `xl/styles.xml`

use super::parser_utils::{attr_value, toggle_value};
use super::workbook::Font;
use crate::error::Result;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufReader;
use zip::ZipArchive;

/// Legacy indexed colour palette (RGB), indices 0..=63
const INDEXED_COLORS: [u32; 64] = [
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, 0x000000,
    0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, 0x800000, 0x008000,
    0x000080, 0x808000, 0x800080, 0x008080, 0xC0C0C0, 0x808080, 0x9999FF, 0x993366, 0xFFFFCC,
    0xCCFFFF, 0x660066, 0xFF8080, 0x0066CC, 0xCCCCFF, 0x000080, 0xFF00FF, 0xFFFF00, 0x00FFFF,
    0x800080, 0x800000, 0x008080, 0x0000FF, 0x00CCFF, 0xCCFFFF, 0xCCFFCC, 0xFFFF99, 0x99CCFF,
    0xFF99CC, 0xCC99FF, 0xFFCC99, 0x3366FF, 0x33CCCC, 0x99CC00, 0xFFCC00, 0xFF9900, 0xFF6600,
    0x666699, 0x969696, 0x003366, 0x339966, 0x003300, 0x333300, 0x993300, 0x993366, 0x333399,
    0x333333,
];

/// Fonts and the cell format → font mapping of a workbook
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    fonts: Vec<Font>,
    /// fontId of each `<xf>` in `<cellXfs>`, indexed by the cell `s` attribute
    xf_fonts: Vec<usize>,
}

impl StyleTable {
    pub fn new(fonts: Vec<Font>, xf_fonts: Vec<usize>) -> Self {
        Self { fonts, xf_fonts }
    }

    /// Font applied by a cell style index
    pub fn font_for(&self, style_index: usize) -> Option<&Font> {
        self.xf_fonts
            .get(style_index)
            .and_then(|font_id| self.fonts.get(*font_id))
    }
}

/// Parse fonts and cell formats from `xl/styles.xml`.
///
/// A workbook without a styles part yields an empty table.
pub fn parse_styles(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
) -> Result<StyleTable> {
    let styles_xml = match archive.by_name("xl/styles.xml") {
        Ok(file) => file,
        Err(_) => return Ok(StyleTable::default()),
    };

    let mut reader = Reader::from_reader(BufReader::new(styles_xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut fonts = Vec::new();
    let mut xf_fonts = Vec::new();
    let mut in_fonts = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<Font> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"fonts" if !is_empty => in_fonts = true,
                    b"font" if in_fonts => {
                        if is_empty {
                            fonts.push(Font::default());
                        } else {
                            current_font = Some(Font::default());
                        }
                    }
                    b"b" => {
                        if let Some(font) = current_font.as_mut() {
                            font.bold = toggle_value(e);
                        }
                    }
                    b"color" => {
                        if let Some(font) = current_font.as_mut() {
                            font.color = color_from_attributes(e);
                        }
                    }
                    b"cellXfs" if !is_empty => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => {
                        let font_id = attr_value(e, b"fontId")
                            .and_then(|v| v.parse::<usize>().ok())
                            .unwrap_or(0);
                        xf_fonts.push(font_id);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fonts" => in_fonts = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "Parsed styles: {} fonts, {} cell formats",
        fonts.len(),
        xf_fonts.len()
    );

    Ok(StyleTable::new(fonts, xf_fonts))
}

/// Resolve a `<color>` element to an ARGB hex string.
///
/// `rgb` wins over `indexed`; theme and automatic colours are left unresolved.
pub fn color_from_attributes(e: &BytesStart) -> Option<String> {
    if let Some(rgb) = attr_value(e, b"rgb") {
        let rgb = rgb.trim().to_ascii_uppercase();
        return if rgb.is_empty() { None } else { Some(rgb) };
    }

    let index = attr_value(e, b"indexed")?.parse::<usize>().ok()?;
    INDEXED_COLORS
        .get(index)
        .map(|rgb| format!("FF{:06X}", rgb))
}
