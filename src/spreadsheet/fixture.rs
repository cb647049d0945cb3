//! Minimal xlsx writer for tests.
//!
//! Cell text conventions: `""` leaves the cell out, text that parses as a number is
//! written as a number, `'text` forces a string, `@date:<serial>` writes a number
//! styled with the built-in date format 14.
#![allow(dead_code)]

use quick_xml::escape::escape;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub struct Workbook {
    sheets: Vec<(String, Vec<Vec<String>>)>,
    shared_strings: bool,
}

impl Workbook {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            shared_strings: false,
        }
    }

    pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.sheets.push((name.to_owned(), rows));
        self
    }

    /// Store text in `xl/sharedStrings.xml` instead of inline strings.
    pub fn shared_strings(mut self, enabled: bool) -> Self {
        self.shared_strings = enabled;
        self
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write fixture workbook");
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut strings: Vec<String> = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut sheet_entries = String::new();
        let mut relationships = String::new();
        for (index, (name, rows)) in self.sheets.iter().enumerate() {
            let id = index + 1;
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                escape(name)
            ));
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
            ));
            let xml = self.sheet_xml(rows, &mut strings);
            zip.start_file(format!("xl/worksheets/sheet{id}.xml"), options).expect("start sheet");
            zip.write_all(xml.as_bytes()).expect("write sheet");
        }

        let workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr/><sheets>{sheet_entries}</sheets></workbook>"#
        );
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
        );
        let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

        for (name, content) in [
            ("xl/workbook.xml", workbook.as_str()),
            ("xl/_rels/workbook.xml.rels", rels.as_str()),
            ("xl/styles.xml", styles),
        ] {
            zip.start_file(name, options).expect("start part");
            zip.write_all(content.as_bytes()).expect("write part");
        }

        if self.shared_strings {
            let items: String = strings
                .iter()
                .map(|text| format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(text)))
                .collect();
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{items}</sst>"#,
                strings.len()
            );
            zip.start_file("xl/sharedStrings.xml", options).expect("start shared strings");
            zip.write_all(xml.as_bytes()).expect("write shared strings");
        }

        zip.finish().expect("finish fixture").into_inner()
    }

    fn sheet_xml(&self, rows: &[Vec<String>], strings: &mut Vec<String>) -> String {
        let mut data = String::new();
        for (row, cells) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, row + 1));
            for (col, text) in cells.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let reference = format!("{}{}", column_letters(col), row + 1);
                if let Some(serial) = text.strip_prefix("@date:") {
                    data.push_str(&format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#));
                } else if text.parse::<f64>().is_ok() {
                    data.push_str(&format!(r#"<c r="{reference}"><v>{text}</v></c>"#));
                } else {
                    let text = text.strip_prefix('\'').unwrap_or(text);
                    if self.shared_strings {
                        strings.push(text.to_owned());
                        data.push_str(&format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, strings.len() - 1));
                    } else {
                        data.push_str(&format!(
                            r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                            escape(text)
                        ));
                    }
                }
            }
            data.push_str("</row>");
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
        )
    }
}

fn column_letters(col: usize) -> String {
    let mut letters = Vec::new();
    let mut column = col + 1;
    while column > 0 {
        column -= 1;
        letters.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    letters.into_iter().collect()
}
