use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the roster pipeline to its front ends.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The spreadsheet is missing, unreadable or not a workbook.
    #[error("{message}")]
    DataSource { path: PathBuf, message: String },

    /// A column the operation needs is absent from the loaded table.
    #[error("Column '{0}' not found")]
    Schema(String),

    /// A row position outside `[0, row_count)`.
    #[error("Row {0} not found")]
    NotFound(i64),
}

impl RosterError {
    pub(crate) fn data_source(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        RosterError::DataSource {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
