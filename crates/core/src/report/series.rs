//! Data tables built from aggregation series.

use std::iter::once;

use rust_decimal::Decimal;

use super::types::Section;
use crate::analytics::{Bucket, BucketValues, DerivedSeries, ViewKind};

impl Section {
    /// Data table with one row per bucket, in series order.
    ///
    /// Columns depend on the view. A village/crop matrix gets one column
    /// per crop followed by the village total.
    #[must_use]
    pub fn from_series(title: impl Into<String>, series: &DerivedSeries) -> Self {
        let rows = series.buckets.iter().map(series_row).collect();
        Self::table(title, series_columns(series), rows)
    }
}

fn series_columns(series: &DerivedSeries) -> Vec<String> {
    let fixed: &[&str] = match series.view {
        ViewKind::CropArea => &["Crop", "Records", "Total Area (Acres)"],
        ViewKind::CropYieldPerArea => &[
            "Crop",
            "Records",
            "Total Yield (kg)",
            "Total Area (Acres)",
            "Yield per Acre (kg)",
        ],
        ViewKind::CropSharePercent => &["Crop", "Records", "Share"],
        ViewKind::VillageYield => &[
            "Village",
            "Records",
            "Total Yield (kg)",
            "Average Yield (kg)",
        ],
        ViewKind::AreaYieldPairs => &["Record", "Name", "Crop", "Area (Acres)", "Yield (kg)"],
        ViewKind::VillageCropMatrix => {
            // Every row carries the same crops in the same order.
            let crops = series
                .buckets
                .first()
                .map(|bucket| match &bucket.values {
                    BucketValues::CropMatrix { cells } => {
                        cells.iter().map(|c| c.crop.clone()).collect()
                    }
                    _ => Vec::new(),
                })
                .unwrap_or_default();
            return once("Village".to_string())
                .chain(crops)
                .chain(once("Total".to_string()))
                .collect();
        }
    };
    fixed.iter().map(|c| (*c).to_string()).collect()
}

fn series_row(bucket: &Bucket) -> Vec<String> {
    let key = bucket.key.clone();
    let count = bucket.count.to_string();
    match &bucket.values {
        BucketValues::CropArea { total_area } => vec![key, count, quantity(*total_area)],
        BucketValues::YieldPerArea {
            total_yield,
            total_area,
            yield_per_area,
        } => vec![
            key,
            count,
            quantity(*total_yield),
            quantity(*total_area),
            yield_per_area.to_string(),
        ],
        BucketValues::Share { percent, .. } => vec![key, count, format!("{percent}%")],
        BucketValues::CropMatrix { cells } => once(key)
            .chain(cells.iter().map(|c| c.count.to_string()))
            .chain(once(count))
            .collect(),
        BucketValues::VillageYield {
            total_yield,
            average_yield,
        } => vec![key, count, quantity(*total_yield), average_yield.to_string()],
        BucketValues::AreaYield {
            area,
            yield_kg,
            crop,
            owner_label,
            ..
        } => vec![
            key,
            owner_label.clone(),
            crop.clone().unwrap_or_default(),
            quantity(*area),
            quantity(*yield_kg),
        ],
    }
}

fn quantity(value: Decimal) -> String {
    value.normalize().to_string()
}
