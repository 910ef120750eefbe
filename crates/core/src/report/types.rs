//! Report document types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agro_shared::types::ArtifactId;

use super::geometry::PageGeometry;

/// Dimensions of a rendered raster artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Artifact ID.
    pub id: ArtifactId,
    /// Width in pixels.
    pub pixel_width: u32,
    /// Height in pixels.
    pub pixel_height: u32,
}

/// One key/value row of a metrics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Label.
    pub key: String,
    /// Formatted value.
    pub value: String,
}

impl KeyValue {
    /// Creates a row.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A requested document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading printed before the body.
    #[serde(default)]
    pub title: Option<String>,
    /// Start the section at the top of a fresh page.
    #[serde(default)]
    pub start_on_new_page: bool,
    /// Section content.
    pub body: SectionBody,
}

/// Section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionBody {
    /// A standalone heading line.
    Heading {
        /// Text.
        text: String,
        /// Level, 1 being the document title.
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    /// Metrics table with a two-column header.
    Metrics {
        /// Header row.
        header: KeyValue,
        /// Body rows.
        rows: Vec<KeyValue>,
    },
    /// Tabular data.
    Table {
        /// Column names.
        columns: Vec<String>,
        /// Body rows.
        rows: Vec<Vec<String>>,
    },
    /// A rendered visual.
    Image {
        /// Artifact to place.
        artifact: ArtifactMeta,
    },
}

fn default_heading_level() -> u8 {
    2
}

impl Section {
    /// A standalone heading.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self {
            title: None,
            start_on_new_page: false,
            body: SectionBody::Heading {
                text: text.into(),
                level,
            },
        }
    }

    /// A metrics table.
    pub fn metrics(title: impl Into<String>, header: KeyValue, rows: Vec<KeyValue>) -> Self {
        Self {
            title: Some(title.into()),
            start_on_new_page: false,
            body: SectionBody::Metrics { header, rows },
        }
    }

    /// A data table.
    pub fn table(title: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            title: Some(title.into()),
            start_on_new_page: false,
            body: SectionBody::Table { columns, rows },
        }
    }

    /// A rendered visual, optionally titled.
    pub fn image(title: Option<String>, artifact: ArtifactMeta) -> Self {
        Self {
            title,
            start_on_new_page: false,
            body: SectionBody::Image { artifact },
        }
    }

    /// Starts this section on a fresh page.
    #[must_use]
    pub const fn on_new_page(mut self) -> Self {
        self.start_on_new_page = true;
        self
    }
}

/// A placed document element. `top` is in page coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Heading line.
    Heading {
        /// Text.
        text: String,
        /// Level, 1 being the document title.
        level: u8,
        /// Vertical position.
        top: Decimal,
    },
    /// Key/value table fragment.
    KeyValueTable {
        /// Header row, repeated on every fragment.
        header: KeyValue,
        /// Rows on this page.
        rows: Vec<KeyValue>,
        /// Shown in place of rows when the table is empty.
        empty_marker: Option<String>,
        /// Whether this fragment continues one from a previous page.
        continued: bool,
        /// Vertical position.
        top: Decimal,
    },
    /// Data table fragment.
    DataTable {
        /// Column names, repeated on every fragment.
        columns: Vec<String>,
        /// Rows on this page.
        rows: Vec<Vec<String>>,
        /// Shown in place of rows when the table is empty.
        empty_marker: Option<String>,
        /// Whether this fragment continues one from a previous page.
        continued: bool,
        /// Vertical position.
        top: Decimal,
    },
    /// Vertical slice of an artifact.
    ImageSlice {
        /// Source artifact.
        artifact_id: ArtifactId,
        /// Offset into the scaled artifact where this slice starts.
        source_offset: Decimal,
        /// Slice height.
        height: Decimal,
        /// Scaled artifact width.
        width: Decimal,
        /// Full scaled artifact height.
        rendered_height: Decimal,
        /// Vertical position.
        top: Decimal,
    },
}

impl Block {
    /// Vertical position of the block.
    #[must_use]
    pub const fn top(&self) -> Decimal {
        match self {
            Self::Heading { top, .. }
            | Self::KeyValueTable { top, .. }
            | Self::DataTable { top, .. }
            | Self::ImageSlice { top, .. } => *top,
        }
    }
}

/// One fixed-size page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1.
    pub number: u32,
    /// Blocks in placement order.
    pub blocks: Vec<Block>,
}

/// The assembled document handed to a document writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Geometry the pages were laid out with.
    pub geometry: PageGeometry,
    /// Pages in order.
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Image slices of one artifact, with their page numbers, in order.
    pub fn slices_of(&self, artifact: ArtifactId) -> impl Iterator<Item = (u32, &Block)> {
        self.pages.iter().flat_map(move |page| {
            page.blocks
                .iter()
                .filter(move |block| {
                    matches!(block, Block::ImageSlice { artifact_id, .. } if *artifact_id == artifact)
                })
                .map(move |block| (page.number, block))
        })
    }
}
