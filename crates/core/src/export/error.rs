//! Export error types.

use thiserror::Error;

use agro_shared::AppError;

use crate::analytics::AnalyticsError;
use crate::report::ReportError;

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The renderer could not produce an artifact for a region.
    #[error("Failed to render region '{region}': {message}")]
    Render {
        /// Region that failed.
        region: String,
        /// Renderer message.
        message: String,
    },

    /// Summary figures could not be computed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Layout failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The document writer failed.
    #[error("Document writer failed: {0}")]
    Writer(String),
}

impl ExportError {
    /// Create a render error.
    #[must_use]
    pub fn render(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            region: region.into(),
            message: message.into(),
        }
    }

    /// Create a writer error.
    #[must_use]
    pub fn writer(message: impl Into<String>) -> Self {
        Self::Writer(message.into())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Analytics(e) => e.into(),
            ExportError::Report(e) => e.into(),
            ExportError::Render { .. } | ExportError::Writer(_) => {
                Self::ExternalService(err.to_string())
            }
        }
    }
}
