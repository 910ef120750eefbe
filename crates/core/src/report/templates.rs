//! Section templates for the two exported reports.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ArtifactMeta, KeyValue, Section};
use crate::analytics::{DashboardSummary, DerivedSeries, VillageStats};
use crate::records::Record;

/// Title of the records report.
pub const RECORDS_REPORT_TITLE: &str = "AgroAnalytics Report";
/// Title of the dashboard report.
pub const DASHBOARD_REPORT_TITLE: &str = "AgroAnalytics Dashboard Report";

/// Title of the crop area table in the dashboard report.
pub const CROP_AREA_TITLE: &str = "Crop Area Distribution";

/// Columns of the records table.
pub const RECORD_COLUMNS: [&str; 6] = [
    "ID",
    "Name",
    "Village",
    "Crop",
    "Area (Acres)",
    "Yield (kg)",
];

/// Columns of the village statistics table.
pub const VILLAGE_COLUMNS: [&str; 4] = [
    "Village Name",
    "Farmer Count",
    "Total Area (Acres)",
    "Contribution",
];

/// A rendered visual with the caption it is printed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedVisual {
    /// Caption, if any.
    #[serde(default)]
    pub caption: Option<String>,
    /// Rendered artifact.
    pub artifact: ArtifactMeta,
}

/// Records report: title, one image per visual, then every record.
pub fn records_report(
    records: &[Record],
    visuals: &[CapturedVisual],
    generated_at: DateTime<Utc>,
) -> Vec<Section> {
    let mut sections = title_block(RECORDS_REPORT_TITLE, generated_at);

    if !visuals.is_empty() {
        sections.push(Section::heading("Data Visualizations", 2));
        sections.extend(
            visuals
                .iter()
                .map(|v| Section::image(v.caption.clone(), v.artifact)),
        );
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.owner_label.clone(),
                r.village_label().unwrap_or_default().to_string(),
                r.crop_label().unwrap_or_default().to_string(),
                format_quantity(r.area),
                format_quantity(r.yield_kg),
            ]
        })
        .collect();

    sections.push(Section::table(
        "Farmer Data Records",
        columns(&RECORD_COLUMNS),
        rows,
    ));
    sections
}

/// Dashboard report: key metrics and the crop table, the dashboard visual
/// on its own page, and village statistics on a further page.
pub fn dashboard_report(
    summary: &DashboardSummary,
    crops: &DerivedSeries,
    villages: &[VillageStats],
    dashboard_visual: Option<ArtifactMeta>,
    generated_at: DateTime<Utc>,
) -> Vec<Section> {
    let mut sections = title_block(DASHBOARD_REPORT_TITLE, generated_at);

    sections.push(Section::metrics(
        "Key Metrics",
        KeyValue::new("Metric", "Value"),
        vec![
            KeyValue::new("Total Farmers", summary.total_records.to_string()),
            KeyValue::new("Total Area (Acres)", summary.total_area.to_string()),
            KeyValue::new("Average Yield (kg)", summary.average_yield.to_string()),
            KeyValue::new("Villages Covered", summary.total_villages.to_string()),
            KeyValue::new("Crops Grown", summary.total_crops.to_string()),
        ],
    ));
    sections.push(Section::from_series(CROP_AREA_TITLE, crops));

    if let Some(artifact) = dashboard_visual {
        sections.push(
            Section::image(Some("Data Visualizations".to_string()), artifact).on_new_page(),
        );
    }

    let rows = villages
        .iter()
        .map(|v| {
            vec![
                v.village.clone(),
                v.count.to_string(),
                v.total_area.to_string(),
                v.contribution_percent
                    .map_or_else(|| "n/a".to_string(), |p| format!("{p}%")),
            ]
        })
        .collect();

    sections.push(
        Section::table("Village Statistics", columns(&VILLAGE_COLUMNS), rows).on_new_page(),
    );
    sections
}

fn title_block(title: &str, generated_at: DateTime<Utc>) -> Vec<Section> {
    vec![
        Section::heading(title, 1),
        Section::heading(
            format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
            3,
        ),
    ]
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| (*c).to_string()).collect()
}

fn format_quantity(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}
