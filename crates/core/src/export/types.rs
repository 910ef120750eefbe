//! Export data types.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use agro_shared::types::ArtifactId;

use crate::report::templates::CapturedVisual;
use crate::report::{ArtifactMeta, ReportDocument};

/// A screen region to capture as a raster artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualRegion {
    /// Region name understood by the renderer (e.g. "crop-area").
    pub name: String,
    /// Caption printed above the captured image.
    #[serde(default)]
    pub caption: Option<String>,
}

impl VisualRegion {
    /// Creates an uncaptioned region.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caption: None,
        }
    }

    /// Sets the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// A rendered raster artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Identity and pixel dimensions.
    pub meta: ArtifactMeta,
    /// Encoded image data.
    pub bytes: Bytes,
}

/// A region paired with the artifact rendered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedVisual {
    /// Source region.
    pub region: VisualRegion,
    /// Rendered artifact.
    pub meta: ArtifactMeta,
}

impl RenderedVisual {
    /// Converts to the form report templates take.
    #[must_use]
    pub fn captured(&self) -> CapturedVisual {
        CapturedVisual {
            caption: self.region.caption.clone(),
            artifact: self.meta,
        }
    }
}

/// Encoded artifact data keyed by artifact ID, handed to the document writer.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: HashMap<ArtifactId, Bytes>,
}

impl ArtifactStore {
    /// Adds an artifact, replacing any earlier data under the same ID.
    pub fn insert(&mut self, artifact: Artifact) {
        self.artifacts.insert(artifact.meta.id, artifact.bytes);
    }

    /// Returns the encoded data of an artifact.
    #[must_use]
    pub fn get(&self, id: ArtifactId) -> Option<&Bytes> {
        self.artifacts.get(&id)
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Result of a completed export.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Laid-out document.
    pub document: ReportDocument,
    /// Bytes produced by the document writer.
    pub bytes: Bytes,
}
