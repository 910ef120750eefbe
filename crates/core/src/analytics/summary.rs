//! Dashboard headline figures and top-N tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::{
    accumulate, group_by, percent_of, required, round_display, sort_desc_by,
};
use super::error::AnalyticsError;
use crate::records::{Record, RecordField, distinct_crops, distinct_villages};

/// Fractional digits of area and yield figures in summaries.
const SUMMARY_DP: u32 = 2;

/// Headline figures for the whole record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Number of records.
    pub total_records: u64,
    /// Summed area, 2 fractional digits.
    pub total_area: Decimal,
    /// Mean yield per record, 2 fractional digits.
    pub average_yield: Decimal,
    /// Distinct village labels.
    pub total_villages: u64,
    /// Distinct crop labels.
    pub total_crops: u64,
}

/// Per-crop totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropStats {
    /// Crop label.
    pub crop: String,
    /// Number of records.
    pub count: u64,
    /// Summed area, 2 fractional digits.
    pub total_area: Decimal,
    /// Mean yield per record, 2 fractional digits.
    pub average_yield: Decimal,
}

/// Per-village totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageStats {
    /// Village label.
    pub village: String,
    /// Number of records.
    pub count: u64,
    /// Summed area, 2 fractional digits.
    pub total_area: Decimal,
    /// Share of the area of all village-labelled records, 1 fractional digit.
    /// `None` when that area is zero.
    pub contribution_percent: Option<Decimal>,
}

/// Service for dashboard summaries.
pub struct SummaryService;

impl SummaryService {
    /// Computes the headline figures. Every record must carry area and yield.
    pub fn summarize(records: &[Record]) -> Result<DashboardSummary, AnalyticsError> {
        let mut total_area = Decimal::ZERO;
        let mut total_yield = Decimal::ZERO;
        for record in records {
            total_area = accumulate(
                total_area,
                required(record, RecordField::Area)?,
                RecordField::Area,
            )?;
            total_yield = accumulate(
                total_yield,
                required(record, RecordField::Yield)?,
                RecordField::Yield,
            )?;
        }

        let count = records.len() as u64;
        let average_yield = total_yield
            .checked_div(Decimal::from(count))
            .unwrap_or(Decimal::ZERO);

        Ok(DashboardSummary {
            total_records: count,
            total_area: round_display(total_area, SUMMARY_DP),
            average_yield: round_display(average_yield, SUMMARY_DP),
            total_villages: distinct_villages(records).len() as u64,
            total_crops: distinct_crops(records).len() as u64,
        })
    }

    /// Crops ordered by summed area, descending.
    pub fn top_crops(records: &[Record], limit: usize) -> Result<Vec<CropStats>, AnalyticsError> {
        let groups = group_by(
            records,
            Record::crop_label,
            &[RecordField::Area, RecordField::Yield],
        )?;
        let mut rows: Vec<_> = groups.into_iter().collect();
        sort_desc_by(&mut rows, |(_, g)| g.area);

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(crop, g)| CropStats {
                crop: crop.to_string(),
                count: g.count,
                total_area: round_display(g.area, SUMMARY_DP),
                average_yield: round_display(
                    g.yield_kg
                        .checked_div(Decimal::from(g.count))
                        .unwrap_or(Decimal::ZERO),
                    SUMMARY_DP,
                ),
            })
            .collect())
    }

    /// Villages ordered by record count, descending, with their area contribution.
    pub fn village_stats(
        records: &[Record],
        limit: usize,
    ) -> Result<Vec<VillageStats>, AnalyticsError> {
        let groups = group_by(records, Record::village_label, &[RecordField::Area])?;
        let overall_area = groups
            .values()
            .try_fold(Decimal::ZERO, |total, g| {
                accumulate(total, g.area, RecordField::Area)
            })?;

        let mut rows: Vec<_> = groups.into_iter().collect();
        sort_desc_by(&mut rows, |(_, g)| g.count);

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(village, g)| VillageStats {
                village: village.to_string(),
                count: g.count,
                total_area: round_display(g.area, SUMMARY_DP),
                contribution_percent: percent_of(g.area, overall_area)
                    .map(|p| round_display(p, 1)),
            })
            .collect())
    }
}
