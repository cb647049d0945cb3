//! # Spreadsheet Reading
//!
//! Reads worksheets out of Office Open XML workbooks (`.xlsx`, `.xlsm`) into a [`Sheet`]
//! of typed cells. Only what the roster needs is read: workbook relationships, the sheet
//! list, the date system, number formats that mark dates, shared strings and cell data.
pub(crate) mod cell;
pub mod criteria;
pub(crate) mod reference;
pub mod sheet;
pub mod xlsx;

#[cfg(test)]
pub(crate) mod fixture;

use crate::error::AtletError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxWorkbook;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported spreadsheet format: '{0}'")]
    FileFormatError(String),

    #[error("Required part '{0}' missing from workbook")]
    FileError(String),

    #[error("Workbook '{0}' has no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("No worksheet in '{0}' matches the requested sheet name")]
    SheetNotFoundError(String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook that can hand out one worksheet at a time.
pub trait SheetSource {
    /// File name of the workbook
    fn name(&self) -> String;

    /// Reads the first worksheet accepted by `criteria`.
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, AtletError>;
}

/// Opens a spreadsheet file, choosing the reader from its extension.
///
/// # Errors
///
/// Fails with [`SpreadsheetError::FileFormatError`] for extensions other than
/// `.xlsx`/`.xlsm`, and with the underlying I/O or archive error when the file cannot
/// be opened or is not a workbook.
pub fn open_spreadsheet(path: &Path) -> Result<Box<dyn SheetSource>, AtletError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx" | "xlsm") => Ok(Box::new(XlsxWorkbook::open(path)?)),
        _ => Err(SpreadsheetError::FileFormatError(path.to_string_lossy().to_string()))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::fixture::Workbook;

    #[test]
    fn open_by_extension() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("roster.XLSX");
        Workbook::new().sheet("Sheet1", &[&["a"], &["1"]]).write_to(&path);

        let mut source = open_spreadsheet(&path).unwrap();
        assert!(source.name().ends_with("roster.XLSX"));
        assert_eq!(source.read_sheet(&Criteria::default()).unwrap().cells.len(), 2);
    }

    #[test]
    fn unsupported_extension() {
        let result = open_spreadsheet(Path::new("roster.ods"));
        assert!(matches!(
            result,
            Err(AtletError::SpreadsheetError(SpreadsheetError::FileFormatError(_)))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = open_spreadsheet(Path::new("/definitely/not/here.xlsx"));
        assert!(matches!(result, Err(AtletError::IoError(_))));
    }
}
