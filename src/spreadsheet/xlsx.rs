use crate::error::AtletError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::DateSystem;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::SheetSource;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship";      // Package relationship
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts");   // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");     // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");   // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");          // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");    // Shared string table item
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");              // Worksheet definition
const TAG_ROW: QName = QName(b"row");                  // Row in worksheet
const TAG_CELL: QName = QName(b"c");                   // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");         // Inline string value
const TAG_VALUE: QName = QName(b"v");                  // Cell value content

/// An Office Open XML workbook opened for reading.
pub struct XlsxWorkbook<RS: Read + Seek = BufReader<File>> {
    /// File name of the workbook
    name: String,
    zip: ZipArchive<RS>,
    /// Cell type per style index (`s` attribute of a cell)
    number_formats: Vec<CellType>,
    /// Worksheets in workbook order as (name, zip path) pairs
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
}

impl XlsxWorkbook {
    /// Opens an xlsx file and reads its workbook structure, styles and shared strings.
    pub fn open(path: &Path) -> Result<Self, AtletError> {
        let file = File::open(path)?;
        Self::from_reader(&path.to_string_lossy(), BufReader::new(file))
    }
}

impl<RS: Read + Seek> XlsxWorkbook<RS> {
    /// Reads the workbook structure from any seekable source.
    ///
    /// # Arguments
    /// * `name` - File name used in error messages
    /// * `reader` - The zipped workbook bytes
    pub fn from_reader(name: &str, reader: RS) -> Result<Self, AtletError> {
        let mut zip = ZipArchive::new(reader)
            .map_err(|_| SpreadsheetError::FileFormatError(name.to_owned()))?;
        let (sheets, system) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        let number_formats = load_number_formats(&mut zip, system)?;
        let shared_strings = load_shared_strings(&mut zip)?;
        Ok(XlsxWorkbook {
            name: name.to_owned(),
            zip,
            number_formats,
            sheets,
            shared_strings,
        })
    }

    /// Names of all worksheets in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn cell_type(&self, kind: Option<&str>, style: Option<&str>) -> Result<CellType, AtletError> {
        let kind = match kind {
            Some("inlineStr" | "str") => CellType::InlineString,
            Some("s") => CellType::SharedString,
            Some("d") => CellType::IsoDateTime,
            Some("b") => CellType::Boolean,
            Some("e") => CellType::Error,
            _ => CellType::Number,
        };
        match style.filter(|style| kind == CellType::Number && !style.is_empty()) {
            Some(style) => {
                let index = style.parse::<usize>()?;
                Ok(self.number_formats.get(index).copied().unwrap_or(CellType::Number))
            }
            None => Ok(kind),
        }
    }

    fn shared_string(&self, sheet: &Sheet, row: usize, col: usize, value: &str) -> Result<String, AtletError> {
        let index = value.trim().parse::<usize>()?;
        self.shared_strings
            .get(index)
            .cloned()
            .ok_or_else(|| {
                SpreadsheetError::CellValueError(
                    sheet.file_name.to_owned(),
                    sheet.name.to_owned(),
                    index_to_reference(row, col),
                    format!("shared string #{index} does not exist"),
                )
                .into()
            })
    }
}

impl<RS: Read + Seek> SheetSource for XlsxWorkbook<RS> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads the first worksheet accepted by `criteria`.
    ///
    /// Cells without a value are skipped, shared strings are resolved and each cell is
    /// typed from its `t` attribute or, for numbers, from its style's number format.
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, AtletError> {
        let (sheet_name, zip_path) = self
            .sheets
            .iter()
            .find(|(name, _)| criteria.accept(name))
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFoundError(self.name.to_owned()))?;

        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut pending = Vec::<(usize, usize, Option<String>, Option<String>, String)>::new();
        {
            let mut reader = self
                .zip
                .xml_reader(&zip_path)?
                .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
            let mut row_count = 0usize;
            let mut col_count = 0usize;
            let mut current: Option<(usize, usize, Option<String>, Option<String>)> = None;
            let mut value = String::new();
            match_xml_events!(reader => {
                Event::Start(event) if event.name() == TAG_ROW => {
                    if let Some(number) = event.attribute("r")? {
                        row_count = number.parse::<usize>()?.saturating_sub(1);
                    }
                    col_count = 0;
                }
                Event::End(event) if event.name() == TAG_ROW => {
                    row_count += 1;
                }
                Event::Start(event) if event.name() == TAG_CELL => {
                    let (row, col) = event.attribute("r")?
                        .and_then(|reference| reference_to_index(&reference))
                        .unwrap_or((row_count, col_count));
                    col_count = col + 1;
                    current = Some((row, col, event.attribute("t")?, event.attribute("s")?));
                    value.clear();
                }
                Event::Start(event) if current.is_some() && event.name() == TAG_INLINE_STRING => {
                    value = reader.read_text(TAG_INLINE_STRING, false)?;
                }
                Event::Start(event) if current.is_some() && event.name() == TAG_VALUE => {
                    value = reader.read_text(TAG_VALUE, true)?;
                }
                Event::End(event) if event.name() == TAG_CELL => {
                    if let Some((row, col, kind, style)) = current.take() {
                        if !value.is_empty() {
                            pending.push((row, col, kind, style, std::mem::take(&mut value)));
                        }
                    }
                }
            });
        }

        for (row, col, kind, style, value) in pending {
            let kind = self.cell_type(kind.as_deref(), style.as_deref())?;
            let value = match kind {
                CellType::SharedString => self.shared_string(&sheet, row, col, &value)?,
                _ => value,
            };
            sheet.push(Cell { row, col, kind, value });
        }
        Ok(sheet)
    }
}

/// Loads worksheet names with their part paths, plus the workbook date system.
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(Vec<(String, String)>, DateSystem), AtletError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut system = DateSystem::V1900;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let name = event.attribute("name")?;
            let id = event.local_attribute("id")?;
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id) {
                    sheets.push((name, path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            let is_1904 = event.attribute("date1904")?
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false);
            if is_1904 {
                system = DateSystem::V1904;
            }
        }
    });
    Ok((sheets, system))
}

/// Maps relationship ids to worksheet part paths.
fn load_relationships<RS: Read + Seek>(zip: &mut ZipArchive<RS>, path: &str) -> Result<HashMap<String, String>, AtletError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.attribute("Id")?;
            let kind = event.attribute("Type")?;
            let target = event.attribute("Target")?;
            if kind.map(|kind| kind.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id, to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Resolves a relationship target to a path inside the archive.
fn to_zip_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Reads `xl/styles.xml` into one cell type per cell format index.
fn load_number_formats<RS: Read + Seek>(zip: &mut ZipArchive<RS>, system: DateSystem) -> Result<Vec<CellType>, AtletError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut in_custom_formats = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut in_format_indexes = false;
    let mut format_ids = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => in_custom_formats = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => in_custom_formats = false,
        Event::Start(event) if in_custom_formats && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.attribute("numFmtId")?;
            let code = event.attribute("formatCode")?;
            if let Some((id, code)) = id.zip(code) {
                custom_formats.insert(id, CellType::from_custom_format(&code, system));
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => in_format_indexes = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => break,
        Event::Start(event) if in_format_indexes && event.name() == TAG_FORMAT_INDEX => {
            format_ids.push(event.attribute("numFmtId")?.unwrap_or_default());
        }
    });

    Ok(format_ids
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::from_builtin_format(id, system))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

/// Reads the shared string table; workbooks without one have none.
fn load_shared_strings<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<String>, AtletError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(reader.read_text(TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}
