//! Analytics error types.

use thiserror::Error;

use agro_shared::AppError;
use agro_shared::types::RecordId;

use crate::records::RecordField;

/// Errors that can occur while aggregating records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The requested view is not one of the known view kinds.
    #[error("Invalid view kind: {0}")]
    InvalidViewKind(String),

    /// A record lacks a field the requested view needs.
    #[error("Malformed record {record_id}: missing or invalid {field}")]
    MalformedRecord {
        /// Offending record.
        record_id: RecordId,
        /// Field that was missing or negative.
        field: RecordField,
    },

    /// A running total left the representable decimal range.
    #[error("Total {field} exceeds the supported range")]
    Overflow {
        /// Field whose total overflowed.
        field: RecordField,
    },
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidViewKind(_) => Self::NotFound(err.to_string()),
            AnalyticsError::MalformedRecord { .. } | AnalyticsError::Overflow { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}
