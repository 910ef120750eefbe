//! Aggregation engine.
//!
//! Accumulation is exact; display rounding happens once, when a bucket is
//! emitted. Sorting uses full-precision values and breaks ties by key.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::error::AnalyticsError;
use super::types::{AggregateParams, Bucket, BucketValues, DerivedSeries, MatrixCell, ViewKind};
use crate::records::{Record, RecordField};

/// Fractional digits of `CropYieldPerArea` ratios.
pub const YIELD_PER_AREA_DP: u32 = 2;
/// Fractional digits of `VillageYield` averages.
pub const AVERAGE_YIELD_DP: u32 = 0;
/// Fractional digits of share percentages.
pub const PERCENT_DP: u32 = 1;

/// Running totals for one group.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GroupTotals {
    pub(crate) count: u64,
    pub(crate) area: Decimal,
    pub(crate) yield_kg: Decimal,
}

/// Engine that derives view series from records.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Aggregates `records` into the series for `view`.
    ///
    /// Records whose grouping label is missing are excluded from grouping
    /// views. A record that is included but lacks a quantity the view needs
    /// fails the whole aggregation with `MalformedRecord`.
    pub fn aggregate(
        records: &[Record],
        view: ViewKind,
        params: &AggregateParams,
    ) -> Result<DerivedSeries, AnalyticsError> {
        let mut buckets = match view {
            ViewKind::CropArea => Self::crop_area(records)?,
            ViewKind::CropYieldPerArea => Self::crop_yield_per_area(records)?,
            ViewKind::CropSharePercent => Self::crop_share(records, params.label_threshold),
            ViewKind::VillageCropMatrix => Self::village_crop_matrix(records),
            ViewKind::VillageYield => Self::village_yield(records)?,
            ViewKind::AreaYieldPairs => Self::area_yield_pairs(records)?,
        };

        if let Some(limit) = params.limit {
            buckets.truncate(limit);
        }

        debug!(
            view = %view,
            records = records.len(),
            buckets = buckets.len(),
            "Aggregated view"
        );

        Ok(DerivedSeries { view, buckets })
    }

    /// Parses `view` and aggregates.
    pub fn aggregate_named(
        records: &[Record],
        view: &str,
        params: &AggregateParams,
    ) -> Result<DerivedSeries, AnalyticsError> {
        let view = view.parse::<ViewKind>()?;
        Self::aggregate(records, view, params)
    }

    fn crop_area(records: &[Record]) -> Result<Vec<Bucket>, AnalyticsError> {
        let groups = group_by(records, Record::crop_label, &[RecordField::Area])?;
        let mut rows: Vec<_> = groups.into_iter().collect();
        sort_desc_by(&mut rows, |(_, g)| g.area);

        Ok(rows
            .into_iter()
            .map(|(key, g)| Bucket {
                key: key.to_string(),
                count: g.count,
                values: BucketValues::CropArea { total_area: g.area },
            })
            .collect())
    }

    fn crop_yield_per_area(records: &[Record]) -> Result<Vec<Bucket>, AnalyticsError> {
        let groups = group_by(
            records,
            Record::crop_label,
            &[RecordField::Area, RecordField::Yield],
        )?;

        // Zero total area has no ratio; the group is left out.
        let mut rows: Vec<_> = groups
            .into_iter()
            .filter_map(|(key, g)| g.yield_kg.checked_div(g.area).map(|ratio| (key, g, ratio)))
            .collect();
        sort_desc_by(&mut rows, |(_, _, ratio)| *ratio);

        Ok(rows
            .into_iter()
            .map(|(key, g, ratio)| Bucket {
                key: key.to_string(),
                count: g.count,
                values: BucketValues::YieldPerArea {
                    total_yield: g.yield_kg,
                    total_area: g.area,
                    yield_per_area: round_display(ratio, YIELD_PER_AREA_DP),
                },
            })
            .collect())
    }

    fn crop_share(records: &[Record], label_threshold: Decimal) -> Vec<Bucket> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for crop in records.iter().filter_map(Record::crop_label) {
            *counts.entry(crop).or_default() += 1;
        }

        let total = Decimal::from(counts.values().sum::<u64>());
        let mut rows: Vec<_> = counts.into_iter().collect();
        sort_desc_by(&mut rows, |(_, count)| *count);

        rows.into_iter()
            .map(|(key, count)| {
                let exact = percent_of(Decimal::from(count), total).unwrap_or(Decimal::ZERO);
                Bucket {
                    key: key.to_string(),
                    count,
                    values: BucketValues::Share {
                        percent: round_display(exact, PERCENT_DP),
                        label_visible: exact >= label_threshold,
                    },
                }
            })
            .collect()
    }

    fn village_crop_matrix(records: &[Record]) -> Vec<Bucket> {
        let mut matrix: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        let mut crops: BTreeSet<&str> = BTreeSet::new();

        for record in records {
            let (Some(village), Some(crop)) = (record.village_label(), record.crop_label()) else {
                continue;
            };
            crops.insert(crop);
            *matrix.entry(village).or_default().entry(crop).or_default() += 1;
        }

        let mut rows: Vec<_> = matrix
            .into_iter()
            .map(|(village, row)| {
                let total: u64 = row.values().sum();
                (village, row, total)
            })
            .collect();
        sort_desc_by(&mut rows, |(_, _, total)| *total);

        rows.into_iter()
            .map(|(village, row, total)| Bucket {
                key: village.to_string(),
                count: total,
                values: BucketValues::CropMatrix {
                    cells: crops
                        .iter()
                        .map(|crop| MatrixCell {
                            crop: (*crop).to_string(),
                            count: row.get(crop).copied().unwrap_or(0),
                        })
                        .collect(),
                },
            })
            .collect()
    }

    fn village_yield(records: &[Record]) -> Result<Vec<Bucket>, AnalyticsError> {
        let groups = group_by(records, Record::village_label, &[RecordField::Yield])?;

        let mut rows: Vec<_> = groups
            .into_iter()
            .filter_map(|(key, g)| {
                g.yield_kg
                    .checked_div(Decimal::from(g.count))
                    .map(|avg| (key, g, avg))
            })
            .collect();
        sort_desc_by(&mut rows, |(_, _, avg)| *avg);

        Ok(rows
            .into_iter()
            .map(|(key, g, avg)| Bucket {
                key: key.to_string(),
                count: g.count,
                values: BucketValues::VillageYield {
                    total_yield: g.yield_kg,
                    average_yield: round_display(avg, AVERAGE_YIELD_DP),
                },
            })
            .collect())
    }

    fn area_yield_pairs(records: &[Record]) -> Result<Vec<Bucket>, AnalyticsError> {
        records
            .iter()
            .map(|record| {
                Ok(Bucket {
                    key: record.id.to_string(),
                    count: 1,
                    values: BucketValues::AreaYield {
                        record_id: record.id,
                        area: required(record, RecordField::Area)?,
                        yield_kg: required(record, RecordField::Yield)?,
                        crop: record.crop_label().map(str::to_string),
                        owner_label: record.owner_label.clone(),
                    },
                })
            })
            .collect()
    }
}

/// Groups records by `key`, skipping records without a key and requiring
/// every field in `needs` on the records that are kept.
pub(crate) fn group_by<'a>(
    records: &'a [Record],
    key: impl Fn(&'a Record) -> Option<&'a str>,
    needs: &[RecordField],
) -> Result<BTreeMap<&'a str, GroupTotals>, AnalyticsError> {
    let mut groups: BTreeMap<&str, GroupTotals> = BTreeMap::new();

    for record in records {
        let Some(label) = key(record) else {
            continue;
        };

        let mut area = Decimal::ZERO;
        let mut yield_kg = Decimal::ZERO;
        for field in needs {
            let value = required(record, *field)?;
            match field {
                RecordField::Area => area = value,
                RecordField::Yield => yield_kg = value,
                RecordField::Crop | RecordField::Village => {}
            }
        }

        let group = groups.entry(label).or_default();
        group.count += 1;
        group.area = accumulate(group.area, area, RecordField::Area)?;
        group.yield_kg = accumulate(group.yield_kg, yield_kg, RecordField::Yield)?;
    }

    Ok(groups)
}

pub(crate) fn required(record: &Record, field: RecordField) -> Result<Decimal, AnalyticsError> {
    record
        .quantity(field)
        .ok_or(AnalyticsError::MalformedRecord {
            record_id: record.id,
            field,
        })
}

/// Adds `value` to a running total of `field`.
pub(crate) fn accumulate(
    total: Decimal,
    value: Decimal,
    field: RecordField,
) -> Result<Decimal, AnalyticsError> {
    total
        .checked_add(value)
        .ok_or(AnalyticsError::Overflow { field })
}

/// Sorts descending by `metric`. Input must already be in key order; the
/// stable sort keeps that order for equal metrics.
pub(crate) fn sort_desc_by<T, M: Ord>(rows: &mut [T], metric: impl Fn(&T) -> M) {
    rows.sort_by(|a, b| metric(b).cmp(&metric(a)));
}

/// `part / whole * 100`, or `None` when `whole` is zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(whole)
}

/// Rounds a value for display.
pub(crate) fn round_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
