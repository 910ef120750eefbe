//! Report error types.

use thiserror::Error;

use agro_shared::AppError;
use agro_shared::types::ArtifactId;

use super::types::ArtifactMeta;

/// Errors that can occur during document assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Artifact has zero width or height, so no scale factor exists.
    #[error("Unrenderable artifact {artifact_id}: {pixel_width}x{pixel_height} pixels")]
    UnrenderableArtifact {
        /// Offending artifact.
        artifact_id: ArtifactId,
        /// Reported pixel width.
        pixel_width: u32,
        /// Reported pixel height.
        pixel_height: u32,
    },

    /// Page geometry cannot hold content.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
}

impl ReportError {
    /// Unrenderable error for `artifact`.
    #[must_use]
    pub const fn unrenderable(artifact: &ArtifactMeta) -> Self {
        Self::UnrenderableArtifact {
            artifact_id: artifact.id,
            pixel_width: artifact.pixel_width,
            pixel_height: artifact.pixel_height,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
