#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Cell style indices available in `DEFAULT_STYLES`
pub const STYLE_PLAIN: usize = 0;
pub const STYLE_BOLD: usize = 1;
pub const STYLE_RED: usize = 2;
pub const STYLE_INDEXED_RED: usize = 3;
pub const STYLE_THEME: usize = 4;
pub const STYLE_BOLD_RED: usize = 5;

pub const DEFAULT_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="6">
<font><sz val="11"/><name val="Calibri"/></font>
<font><b/><sz val="11"/><name val="Calibri"/></font>
<font><sz val="11"/><color rgb="FFFF0000"/><name val="Calibri"/></font>
<font><sz val="11"/><color indexed="10"/><name val="Calibri"/></font>
<font><sz val="11"/><color theme="1"/><name val="Calibri"/></font>
<font><b val="1"/><color rgb="ffff0000"/></font>
</fonts>
<cellXfs count="6">
<xf numFmtId="0" fontId="0"/>
<xf numFmtId="0" fontId="1" applyFont="1"/>
<xf numFmtId="0" fontId="2" applyFont="1"/>
<xf numFmtId="0" fontId="3" applyFont="1"/>
<xf numFmtId="0" fontId="4" applyFont="1"/>
<xf numFmtId="0" fontId="5" applyFont="1"/>
</cellXfs>
</styleSheet>"#;

/// One worksheet of a mock workbook
pub struct MockSheet {
    name: String,
    state: Option<&'static str>,
    rows: Vec<(u32, String)>,
    merges: Vec<String>,
}

impl MockSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: None,
            rows: Vec::new(),
            merges: Vec::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.state = Some("hidden");
        self
    }

    /// Raw `<c>` elements for one row
    pub fn row(mut self, row: u32, cells: &str) -> Self {
        self.rows.push((row, cells.to_string()));
        self
    }

    pub fn merge(mut self, reference: &str) -> Self {
        self.merges.push(reference.to_string());
        self
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in &self.rows {
            xml.push_str(&format!(r#"<row r="{}">{}</row>"#, row, cells));
        }
        xml.push_str("</sheetData>");
        if !self.merges.is_empty() {
            xml.push_str(&format!(r#"<mergeCells count="{}">"#, self.merges.len()));
            for reference in &self.merges {
                xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, reference));
            }
            xml.push_str("</mergeCells>");
        }
        xml.push_str("</worksheet>");
        xml
    }
}

/// Builder for minimal XLSX packages
pub struct MockWorkbook {
    sheets: Vec<MockSheet>,
    shared_strings: Vec<String>,
    styles: Option<String>,
}

impl MockWorkbook {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            shared_strings: Vec::new(),
            styles: Some(DEFAULT_STYLES.to_string()),
        }
    }

    pub fn sheet(mut self, sheet: MockSheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Inner XML of one `<si>` item
    pub fn shared_string(mut self, item: &str) -> Self {
        self.shared_strings.push(item.to_string());
        self
    }

    pub fn without_styles(mut self) -> Self {
        self.styles = None;
        self
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options)?;
        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
        );
        for i in 0..self.sheets.len() {
            content_types.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }
        content_types.push_str("</Types>");
        zip.write_all(content_types.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        let mut workbook_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>"#,
        );
        for (i, sheet) in self.sheets.iter().enumerate() {
            let state = sheet
                .state
                .map(|state| format!(r#" state="{}""#, state))
                .unwrap_or_default();
            workbook_xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
                sheet.name,
                i + 1,
                state,
                i + 1
            ));
        }
        workbook_xml.push_str("</sheets></workbook>");
        zip.write_all(workbook_xml.as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        let mut rels_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        for i in 0..self.sheets.len() {
            rels_xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }
        rels_xml.push_str("</Relationships>");
        zip.write_all(rels_xml.as_bytes())?;

        if !self.shared_strings.is_empty() {
            zip.start_file("xl/sharedStrings.xml", options)?;
            let mut sst = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
                self.shared_strings.len()
            );
            for item in &self.shared_strings {
                sst.push_str(&format!("<si>{}</si>", item));
            }
            sst.push_str("</sst>");
            zip.write_all(sst.as_bytes())?;
        }

        if let Some(styles) = &self.styles {
            zip.start_file("xl/styles.xml", options)?;
            zip.write_all(styles.as_bytes())?;
        }

        for (i, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            zip.write_all(sheet.to_xml().as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// A shared-string cell reference, e.g. `s("A1", 0, STYLE_BOLD)`
pub fn s(reference: &str, index: usize, style: usize) -> String {
    format!(
        r#"<c r="{}" s="{}" t="s"><v>{}</v></c>"#,
        reference, style, index
    )
}

/// An inline-string cell
pub fn inline(reference: &str, text: &str, style: usize) -> String {
    format!(
        r#"<c r="{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference, style, text
    )
}

/// A numeric cell
pub fn num(reference: &str, value: &str) -> String {
    format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value)
}
