use gridcalc_core::SheetError;
use thiserror::Error;

/// Errors surfaced by the spreadsheet facade
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpreadsheetError {
    /// Stable error code for UI collaborators
    pub fn code(&self) -> &'static str {
        match self {
            SpreadsheetError::Sheet(err) => err.code(),
            SpreadsheetError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, SpreadsheetError>;
