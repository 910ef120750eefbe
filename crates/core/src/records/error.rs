//! Record export error types.

use thiserror::Error;

use agro_shared::AppError;

/// Errors that can occur while exporting records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordsError {
    /// The record set to export is empty.
    #[error("No data to export")]
    NoData,

    /// The CSV writer failed.
    #[error("CSV export failed: {0}")]
    Csv(String),
}

impl From<RecordsError> for AppError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::NoData => Self::Validation(err.to_string()),
            RecordsError::Csv(_) => Self::Internal(err.to_string()),
        }
    }
}
