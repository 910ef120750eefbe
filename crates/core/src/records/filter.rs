//! Record filtering applied before a view is recomputed.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Record, RecordField};

/// Filter for narrowing the record set shown on the dashboard.
///
/// Empty fields match everything. Numeric bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Exact crop label.
    pub crop: Option<String>,
    /// Exact village label.
    pub village: Option<String>,
    /// Minimum plot area.
    pub min_area: Option<Decimal>,
    /// Maximum plot area.
    pub max_area: Option<Decimal>,
    /// Minimum yield.
    pub min_yield: Option<Decimal>,
    /// Maximum yield.
    pub max_yield: Option<Decimal>,
}

impl RecordFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one crop.
    #[must_use]
    pub fn with_crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    /// Restricts to one village.
    #[must_use]
    pub fn with_village(mut self, village: impl Into<String>) -> Self {
        self.village = Some(village.into());
        self
    }

    /// Restricts the area to `[min, max]`; either side may be open.
    #[must_use]
    pub const fn with_area_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_area = min;
        self.max_area = max;
        self
    }

    /// Restricts the yield to `[min, max]`; either side may be open.
    #[must_use]
    pub const fn with_yield_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_yield = min;
        self.max_yield = max;
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns true if `record` passes every populated criterion.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        label_matches(self.crop.as_deref(), record.crop_label())
            && label_matches(self.village.as_deref(), record.village_label())
            && within(
                record.quantity(RecordField::Area),
                self.min_area,
                self.max_area,
            )
            && within(
                record.quantity(RecordField::Yield),
                self.min_yield,
                self.max_yield,
            )
    }

    /// Returns the matching records in input order.
    #[must_use]
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        if self.is_empty() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

fn label_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted.map(str::trim).filter(|w| !w.is_empty()) {
        None => true,
        Some(w) => actual == Some(w),
    }
}

fn within(value: Option<Decimal>, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

/// Lexically sorted unique crop labels, for filter option lists.
#[must_use]
pub fn distinct_crops(records: &[Record]) -> Vec<String> {
    distinct(records.iter().filter_map(Record::crop_label))
}

/// Lexically sorted unique village labels, for filter option lists.
#[must_use]
pub fn distinct_villages(records: &[Record]) -> Vec<String> {
    distinct(records.iter().filter_map(Record::village_label))
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
