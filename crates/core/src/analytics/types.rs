//! Analytics data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agro_shared::types::RecordId;

use super::error::AnalyticsError;

/// The fixed set of aggregation views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Summed area and record count per crop, area descending.
    CropArea,
    /// Summed yield over summed area per crop, ratio descending.
    CropYieldPerArea,
    /// Record count and share of total per crop, count descending.
    CropSharePercent,
    /// Record count per village and crop, village total descending.
    VillageCropMatrix,
    /// Summed and average yield per village, average descending.
    VillageYield,
    /// One (area, yield) point per record, input order.
    AreaYieldPairs,
}

impl ViewKind {
    /// All view kinds in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CropArea,
        Self::CropYieldPerArea,
        Self::CropSharePercent,
        Self::VillageCropMatrix,
        Self::VillageYield,
        Self::AreaYieldPairs,
    ];

    /// Returns the snake_case name of the view.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CropArea => "crop_area",
            Self::CropYieldPerArea => "crop_yield_per_area",
            Self::CropSharePercent => "crop_share_percent",
            Self::VillageCropMatrix => "village_crop_matrix",
            Self::VillageYield => "village_yield",
            Self::AreaYieldPairs => "area_yield_pairs",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == normalized)
            .ok_or_else(|| AnalyticsError::InvalidViewKind(s.to_string()))
    }
}

/// Optional parameters for an aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateParams {
    /// Keep only the first `limit` buckets after sorting.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Share percentage below which a pie label is hidden.
    #[serde(default = "default_label_threshold")]
    pub label_threshold: Decimal,
}

fn default_label_threshold() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            limit: None,
            label_threshold: default_label_threshold(),
        }
    }
}

impl AggregateParams {
    /// Keeps only the first `limit` buckets.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Ordered output of one aggregation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSeries {
    /// View that produced this series.
    pub view: ViewKind,
    /// Buckets in the view's sort order.
    pub buckets: Vec<Bucket>,
}

impl DerivedSeries {
    /// Creates an empty series for a view.
    #[must_use]
    pub const fn empty(view: ViewKind) -> Self {
        Self {
            view,
            buckets: Vec::new(),
        }
    }

    /// Returns true if the series has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Sum of bucket counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Bucket keys in series order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.key.as_str())
    }
}

/// One grouped output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Grouping key (crop label, village label, or record id for pairs).
    pub key: String,
    /// Number of records in the bucket.
    pub count: u64,
    /// View-specific numeric fields.
    pub values: BucketValues,
}

/// View-specific bucket fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BucketValues {
    /// Crop area totals.
    CropArea {
        /// Summed area.
        total_area: Decimal,
    },
    /// Yield efficiency for a crop.
    YieldPerArea {
        /// Summed yield.
        total_yield: Decimal,
        /// Summed area.
        total_area: Decimal,
        /// Yield per unit area, 2 fractional digits.
        yield_per_area: Decimal,
    },
    /// Share of all crop-labelled records.
    Share {
        /// Percentage of total, 1 fractional digit.
        percent: Decimal,
        /// Whether a pie label should be drawn for this slice.
        label_visible: bool,
    },
    /// Crop counts for one village.
    CropMatrix {
        /// One cell per crop present in the matrix, crop-lexical order.
        cells: Vec<MatrixCell>,
    },
    /// Yield totals for a village.
    VillageYield {
        /// Summed yield.
        total_yield: Decimal,
        /// Average yield per record, 0 fractional digits.
        average_yield: Decimal,
    },
    /// A scatter point for one record.
    AreaYield {
        /// Source record.
        record_id: RecordId,
        /// Plot area.
        area: Decimal,
        /// Yield.
        yield_kg: Decimal,
        /// Crop label, if any.
        crop: Option<String>,
        /// Producer display name.
        owner_label: String,
    },
}

/// One crop cell of a village row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    /// Crop label.
    pub crop: String,
    /// Records with this village and crop.
    pub count: u64,
}
