//! Page geometry.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use agro_shared::config::ReportConfig;

use super::error::ReportError;
use super::types::ArtifactMeta;

/// Fractional digits kept for a rendered artifact height.
const RENDERED_HEIGHT_DP: u32 = 4;

/// Fixed page geometry, every value in one consistent unit.
///
/// Vertical positions inside the printable area are measured from its top
/// edge; `top_margin` converts them to page coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Printable width.
    pub content_width: Decimal,
    /// Printable height.
    pub content_height: Decimal,
    /// Distance from the page top to the printable area.
    pub top_margin: Decimal,
    /// Distance from the page left edge to the printable area.
    #[serde(default)]
    pub left_margin: Decimal,
    /// Height of a table header row.
    pub header_height: Decimal,
    /// Height of a table body row.
    pub row_height: Decimal,
    /// Height consumed by a heading.
    pub heading_height: Decimal,
    /// Gap after each table or image section.
    #[serde(default)]
    pub section_gap: Decimal,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl From<&ReportConfig> for PageGeometry {
    fn from(config: &ReportConfig) -> Self {
        Self {
            content_width: config.content_width,
            content_height: config.content_height,
            top_margin: config.top_margin,
            left_margin: config.left_margin,
            header_height: config.header_height,
            row_height: config.row_height,
            heading_height: config.heading_height,
            section_gap: config.section_gap,
        }
    }
}

impl PageGeometry {
    /// A4 portrait in millimetres.
    #[must_use]
    pub fn a4() -> Self {
        Self::from(&ReportConfig::default())
    }

    /// Checks that every dimension is usable and that a page holds at
    /// least one table row under its header.
    pub fn validate(&self) -> Result<(), ReportError> {
        let positive = [
            ("content_width", self.content_width),
            ("content_height", self.content_height),
            ("header_height", self.header_height),
            ("row_height", self.row_height),
            ("heading_height", self.heading_height),
        ];
        for (name, value) in positive {
            if value <= Decimal::ZERO {
                return Err(ReportError::InvalidGeometry(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("top_margin", self.top_margin),
            ("left_margin", self.left_margin),
            ("section_gap", self.section_gap),
        ];
        for (name, value) in non_negative {
            if value.is_sign_negative() {
                return Err(ReportError::InvalidGeometry(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.top_margin.checked_add(self.content_height).is_none() {
            return Err(ReportError::InvalidGeometry(
                "top_margin plus content_height exceeds the supported range".to_string(),
            ));
        }
        if self.heading_height > self.content_height {
            return Err(ReportError::InvalidGeometry(
                "heading does not fit on a page".to_string(),
            ));
        }
        if self.rows_per_page() == 0 {
            return Err(ReportError::InvalidGeometry(
                "page cannot hold a header and one row".to_string(),
            ));
        }
        Ok(())
    }

    /// Rows a fresh page holds under a table header.
    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        self.rows_fitting(self.content_height)
    }

    /// Rows that fit under a header in `available` height.
    ///
    /// Saturates at `usize::MAX` when the count is too large to represent.
    #[must_use]
    pub fn rows_fitting(&self, available: Decimal) -> usize {
        if self.row_height <= Decimal::ZERO || available < self.header_height {
            return 0;
        }
        (available - self.header_height)
            .checked_div(self.row_height)
            .map_or(usize::MAX, |rows| rows.floor().to_usize().unwrap_or(usize::MAX))
    }

    /// Height an artifact occupies once scaled to the content width.
    ///
    /// An artifact with a zero dimension, or whose scaled height leaves the
    /// decimal range, is unrenderable.
    pub fn rendered_height(&self, artifact: &ArtifactMeta) -> Result<Decimal, ReportError> {
        let unrenderable = || ReportError::unrenderable(artifact);
        if artifact.pixel_width == 0 || artifact.pixel_height == 0 {
            return Err(unrenderable());
        }
        let scaled = Decimal::from(artifact.pixel_height)
            .checked_mul(self.content_width)
            .and_then(|v| v.checked_div(Decimal::from(artifact.pixel_width)))
            .ok_or_else(unrenderable)?;
        Ok(scaled.round_dp(RENDERED_HEIGHT_DP))
    }

    /// Converts a position inside the printable area to a page coordinate.
    #[must_use]
    pub fn page_y(&self, cursor: Decimal) -> Decimal {
        self.top_margin + cursor
    }
}
