//! Common parsing utilities shared by the workbook part parsers

use crate::error::Result;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a cell reference like "A1" into (row, col) as 1-based indices.
///
/// Absolute markers (`$A$1`) are ignored.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col = 0u32;
    let mut row_str = String::new();

    for ch in cell_ref.chars() {
        if ch.is_ascii_alphabetic() {
            if !row_str.is_empty() {
                return None;
            }
            col = col
                .checked_mul(26)?
                .checked_add(ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
        } else if ch.is_ascii_digit() {
            row_str.push(ch);
        } else if ch != '$' {
            return None;
        }
    }

    if col == 0 || row_str.is_empty() {
        return None;
    }

    let row = row_str.parse::<u32>().ok()?;
    if row == 0 {
        return None;
    }

    Some((row, col))
}

/// Parse a cell range like "A1:B2" into (start_row, start_col, end_row, end_col).
///
/// A single reference ("C3") is treated as a one-cell range.
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    match range.split_once(':') {
        Some((start, end)) => {
            let (start_row, start_col) = parse_cell_ref(start)?;
            let (end_row, end_col) = parse_cell_ref(end)?;
            Some((start_row, start_col, end_row, end_col))
        }
        None => {
            let (row, col) = parse_cell_ref(range)?;
            Some((row, col, row, col))
        }
    }
}

/// Convert a 1-based column number to its letter form (1 -> A, 27 -> AA)
pub fn column_letter(mut col: u32) -> String {
    let mut letters = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        col = (col - rem - 1) / 26;
    }
    letters
}

/// Format a 1-based (row, col) pair as an A1-style reference
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row)
}

/// Read text content from an XML node, up to its closing tag.
///
/// `_xHHHH_` character escapes are decoded.
pub fn read_text_node<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(e.unescape()?.as_ref()),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(decode_escapes(&text))
}

/// Decode OOXML `_xHHHH_` escapes (`_x000D_` is a carriage return).
///
/// `_x005F_` stands for a literal underscore, so `_x005F_x0009_` decodes to the
/// text `_x0009_`. Sequences that are not four hex digits stay as written.
pub fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match escaped_char(candidate) {
            Some(ch) => {
                out.push(ch);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn escaped_char(candidate: &str) -> Option<char> {
    let hex = candidate.get(2..6)?;
    if candidate.as_bytes().get(6) != Some(&b'_') || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Skip everything up to and including the end tag matching `name`.
pub fn skip_element<R: std::io::BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == name => depth += 1,
            Event::End(e) if e.name().as_ref() == name => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// Look up an attribute value by key, unescaped.
pub fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Interpret an OOXML boolean toggle element such as `<b/>` or `<b val="0"/>`.
pub fn toggle_value(e: &BytesStart) -> bool {
    match attr_value(e, b"val") {
        Some(val) => !(val == "0" || val.eq_ignore_ascii_case("false")),
        None => true,
    }
}
