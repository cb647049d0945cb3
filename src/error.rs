use thiserror::Error;

/// Crate-wide error type for reading rosters.
/// Collects errors from the standard library, the archive/XML stack and internal modules
/// so that `?` works uniformly inside the spreadsheet reader.
#[derive(Error, Debug)]
pub enum AtletError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, AtletError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| AtletError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_message() {
        let result: Result<(), AtletError> = Err(AtletError::WithContextError("boom".to_owned()));
        let error = result.with_prefix("read 'a.xlsx'").unwrap_err();
        assert_eq!(error.to_string(), "read 'a.xlsx': boom");
    }

    #[test]
    fn with_prefix_keeps_success() {
        let result: Result<u8, AtletError> = Ok(7);
        assert_eq!(result.with_prefix("unused").unwrap(), 7);
    }
}
