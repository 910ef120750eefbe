//! Exact vertical slicing of a scaled artifact across pages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placement of one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlicePlan {
    /// Pages to advance past the current one before placing (0 = current page).
    pub page_offset: usize,
    /// Position inside the printable area.
    pub cursor: Decimal,
    /// Offset into the scaled artifact.
    pub source_offset: Decimal,
    /// Slice height.
    pub height: Decimal,
}

impl SlicePlan {
    /// Cursor position right below this slice.
    #[must_use]
    pub fn end(&self) -> Decimal {
        self.cursor + self.height
    }
}

/// Plans the slices for an artifact of scaled height `rendered_height`
/// starting at `cursor` on a page whose printable height is `content_height`.
///
/// The first slice takes whatever room is left on the current page; every
/// following slice starts at the top of a new page and takes up to a full
/// page. Offsets partition `[0, rendered_height)` exactly: the remaining
/// height is carried forward rather than each slice being derived on its own.
/// A cursor already at the bottom moves to the next page first.
#[must_use]
pub fn slice_image(
    rendered_height: Decimal,
    content_height: Decimal,
    cursor: Decimal,
) -> Vec<SlicePlan> {
    let mut slices = Vec::new();
    if rendered_height <= Decimal::ZERO || content_height <= Decimal::ZERO {
        return slices;
    }

    let mut page_offset = 0;
    let mut y = cursor.max(Decimal::ZERO);
    if y >= content_height {
        page_offset = 1;
        y = Decimal::ZERO;
    }

    let mut left = rendered_height;
    while left > Decimal::ZERO {
        let height = left.min(content_height - y);
        slices.push(SlicePlan {
            page_offset,
            cursor: y,
            source_offset: rendered_height - left,
            height,
        });
        left -= height;
        page_offset += 1;
        y = Decimal::ZERO;
    }

    slices
}
