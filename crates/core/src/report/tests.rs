//! Layout tests for the report module.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use agro_shared::types::{ArtifactId, OwnerId, RecordId};

use super::assembler::{DocumentAssembler, MAX_IMAGE_PAGES, NO_RECORDS_MARKER};
use super::error::ReportError;
use super::geometry::PageGeometry;
use super::templates::{CROP_AREA_TITLE, CapturedVisual, dashboard_report, records_report};
use super::types::{ArtifactMeta, Block, KeyValue, ReportDocument, Section};
use crate::analytics::{
    AggregateParams, AggregationEngine, Bucket, BucketValues, DashboardSummary, DerivedSeries,
    VillageStats, ViewKind,
};
use crate::records::Record;

/// Small page that keeps the arithmetic readable: 260 high, rows of 10.
fn geometry() -> PageGeometry {
    PageGeometry {
        content_width: dec!(182),
        content_height: dec!(260),
        top_margin: dec!(20),
        left_margin: dec!(14),
        header_height: dec!(10),
        row_height: dec!(10),
        heading_height: dec!(30),
        section_gap: Decimal::ZERO,
    }
}

fn assemble(sections: &[Section]) -> ReportDocument {
    DocumentAssembler::new(geometry())
        .unwrap()
        .assemble(sections)
        .unwrap()
}

/// Artifact whose scaled height equals `height` on the test geometry.
fn artifact(height: u32) -> ArtifactMeta {
    ArtifactMeta {
        id: ArtifactId::new(),
        pixel_width: 182,
        pixel_height: height,
    }
}

fn rows(n: usize) -> Vec<Vec<String>> {
    (0..n).map(|i| vec![i.to_string(), format!("row {i}")]).collect()
}

fn columns() -> Vec<String> {
    vec!["#".to_string(), "Name".to_string()]
}

fn block_height(geometry: &PageGeometry, block: &Block) -> Decimal {
    match block {
        Block::Heading { .. } => geometry.heading_height,
        Block::KeyValueTable { rows, .. } => {
            geometry.header_height + geometry.row_height * Decimal::from(rows.len().max(1))
        }
        Block::DataTable { rows, .. } => {
            geometry.header_height + geometry.row_height * Decimal::from(rows.len().max(1))
        }
        Block::ImageSlice { height, .. } => *height,
    }
}

fn data_fragments(document: &ReportDocument) -> Vec<(u32, usize, bool)> {
    document
        .pages
        .iter()
        .flat_map(|page| {
            page.blocks.iter().filter_map(move |block| match block {
                Block::DataTable {
                    rows, continued, ..
                } => Some((page.number, rows.len(), *continued)),
                _ => None,
            })
        })
        .collect()
}

// ============================================================================
// Image slicing through the assembler
// ============================================================================

#[test]
fn test_image_sliced_below_heading() {
    let image = artifact(1000);
    let document = assemble(&[
        Section::heading("Report", 1),
        Section::image(None, image),
    ]);

    let slices: Vec<_> = document.slices_of(image.id).collect();
    assert_eq!(document.page_count(), 4);
    assert_eq!(
        slices.iter().map(|(page, _)| *page).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let mut expected_offset = Decimal::ZERO;
    let expected_heights = [dec!(230), dec!(260), dec!(260), dec!(250)];
    for ((_, block), expected) in slices.iter().zip(expected_heights) {
        let Block::ImageSlice {
            source_offset,
            height,
            rendered_height,
            ..
        } = block
        else {
            panic!("expected an image slice");
        };
        assert_eq!(*height, expected);
        assert_eq!(*source_offset, expected_offset);
        assert_eq!(*rendered_height, dec!(1000));
        expected_offset += *height;
    }
    assert_eq!(expected_offset, dec!(1000));

    // First slice sits right under the heading, the rest at the top margin.
    assert_eq!(slices[0].1.top(), dec!(50));
    assert!(slices[1..].iter().all(|(_, b)| b.top() == dec!(20)));
}

#[test]
fn test_image_exactly_one_page() {
    let image = artifact(260);
    let document = assemble(&[Section::image(None, image)]);

    assert_eq!(document.page_count(), 1);
    assert_eq!(document.slices_of(image.id).count(), 1);
}

#[test]
fn test_unrenderable_artifact_rejected() {
    let broken = ArtifactMeta {
        id: ArtifactId::new(),
        pixel_width: 0,
        pixel_height: 400,
    };
    let result = DocumentAssembler::new(geometry())
        .unwrap()
        .assemble(&[Section::heading("Report", 1), Section::image(None, broken)]);

    assert_eq!(
        result,
        Err(ReportError::UnrenderableArtifact {
            artifact_id: broken.id,
            pixel_width: 0,
            pixel_height: 400,
        })
    );
}

#[test]
fn test_image_scaled_out_of_range_rejected() {
    let mut wide = geometry();
    wide.content_width = Decimal::MAX;
    let image = ArtifactMeta {
        id: ArtifactId::new(),
        pixel_width: 1,
        pixel_height: 2,
    };

    let result = DocumentAssembler::new(wide)
        .unwrap()
        .assemble(&[Section::image(None, image)]);
    assert_eq!(result, Err(ReportError::unrenderable(&image)));
}

#[test]
fn test_image_spanning_too_many_pages_rejected() {
    // 182 * 2000 = 364000 high, far more than the page limit allows.
    let tall = ArtifactMeta {
        id: ArtifactId::new(),
        pixel_width: 1,
        pixel_height: 2000,
    };
    assert!(Decimal::from(364_000) > dec!(260) * Decimal::from(MAX_IMAGE_PAGES));

    let result = DocumentAssembler::new(geometry())
        .unwrap()
        .assemble(&[Section::image(None, tall)]);
    assert_eq!(result, Err(ReportError::unrenderable(&tall)));
}

#[test]
fn test_image_title_not_left_alone_at_page_bottom() {
    // Title (30) + header (10) + 19 rows (190) leaves exactly one heading of room.
    let image = artifact(100);
    let document = assemble(&[
        Section::table("Records", columns(), rows(19)),
        Section::image(Some("Crop area".to_string()), image),
    ]);

    assert_eq!(document.page_count(), 2);
    assert_eq!(document.pages[0].blocks.len(), 2);
    assert!(matches!(
        &document.pages[1].blocks[0],
        Block::Heading { text, top, .. } if text == "Crop area" && *top == dec!(20)
    ));
    assert_eq!(
        document.slices_of(image.id).map(|(page, _)| page).collect::<Vec<_>>(),
        vec![2]
    );
}

// ============================================================================
// Table pagination
// ============================================================================

#[test]
fn test_empty_table_renders_header_and_marker() {
    let document = assemble(&[Section::table("Records", columns(), Vec::new())]);

    assert_eq!(document.page_count(), 1);
    let blocks = &document.pages[0].blocks;
    assert_eq!(blocks.len(), 2);
    assert!(matches!(&blocks[0], Block::Heading { text, .. } if text == "Records"));
    match &blocks[1] {
        Block::DataTable {
            columns: cols,
            rows,
            empty_marker,
            continued,
            ..
        } => {
            assert_eq!(cols, &columns());
            assert!(rows.is_empty());
            assert_eq!(empty_marker.as_deref(), Some(NO_RECORDS_MARKER));
            assert!(!continued);
        }
        other => panic!("expected a data table, got {other:?}"),
    }
}

#[test]
fn test_table_header_repeats_on_continuation_pages() {
    let document = assemble(&[Section::table("Records", columns(), rows(50))]);

    // Page 1: title (30) leaves 230, so (230 - 10) / 10 = 22 rows.
    // Page 2: (260 - 10) / 10 = 25 rows. Page 3: the remaining 3.
    assert_eq!(
        data_fragments(&document),
        vec![(1, 22, false), (2, 25, true), (3, 3, true)]
    );

    for page in &document.pages {
        for block in &page.blocks {
            if let Block::DataTable { columns: cols, .. } = block {
                assert_eq!(cols, &columns());
            }
        }
    }

    // Row order survives the split.
    let all_rows: Vec<Vec<String>> = document
        .pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| match b {
            Block::DataTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(all_rows, rows(50));
}

#[test]
fn test_metrics_table_paginates_like_data_table() {
    let metrics: Vec<KeyValue> = (0..30)
        .map(|i| KeyValue::new(format!("metric {i}"), i.to_string()))
        .collect();
    let document = assemble(&[Section::metrics(
        "Key Metrics",
        KeyValue::new("Metric", "Value"),
        metrics,
    )]);

    let fragments: Vec<(usize, bool)> = document
        .pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| match b {
            Block::KeyValueTable {
                rows,
                continued,
                header,
                ..
            } => {
                assert_eq!(header, &KeyValue::new("Metric", "Value"));
                Some((rows.len(), *continued))
            }
            _ => None,
        })
        .collect();
    assert_eq!(fragments, vec![(22, false), (8, true)]);
}

// ============================================================================
// Page breaks
// ============================================================================

#[test]
fn test_start_on_new_page() {
    let document = assemble(&[
        Section::heading("Report", 1),
        Section::table("Records", columns(), rows(2)).on_new_page(),
    ]);

    assert_eq!(document.page_count(), 2);
    assert_eq!(document.pages[1].number, 2);
    assert!(matches!(
        &document.pages[1].blocks[0],
        Block::Heading { text, top, .. } if text == "Records" && *top == dec!(20)
    ));
}

#[test]
fn test_new_page_request_on_empty_page_adds_no_blank_page() {
    let document = assemble(&[Section::table("Records", columns(), rows(2)).on_new_page()]);
    assert_eq!(document.page_count(), 1);
}

#[test]
fn test_title_kept_with_first_row() {
    // Seven headings leave exactly 50: title (30) + header (10) + one row (10).
    let mut sections: Vec<Section> = (0..7).map(|i| Section::heading(format!("h{i}"), 3)).collect();
    sections.push(Section::table("Records", columns(), rows(3)));
    let document = assemble(&sections);
    assert_eq!(data_fragments(&document), vec![(1, 1, false), (2, 2, true)]);

    // One more heading leaves 20, so the title moves along with the table.
    let mut sections: Vec<Section> = (0..8).map(|i| Section::heading(format!("h{i}"), 3)).collect();
    sections.push(Section::table("Records", columns(), rows(3)));
    let document = assemble(&sections);
    assert_eq!(data_fragments(&document), vec![(2, 3, false)]);
    assert!(matches!(
        &document.pages[1].blocks[0],
        Block::Heading { text, .. } if text == "Records"
    ));
}

#[test]
fn test_huge_page_with_tiny_rows_lays_out() {
    let huge = PageGeometry {
        top_margin: Decimal::ZERO,
        content_height: Decimal::MAX,
        row_height: dec!(0.0000001),
        section_gap: Decimal::MAX,
        ..geometry()
    };

    let document = DocumentAssembler::new(huge)
        .unwrap()
        .assemble(&[
            Section::table("Records", columns(), rows(3)),
            Section::table("More", columns(), rows(2)),
        ])
        .unwrap();

    // The gap fills the first page, so the second table starts a new one.
    assert_eq!(
        data_fragments(&document),
        vec![(1, 3, false), (2, 2, false)]
    );
}

#[test]
fn test_no_sections_no_pages() {
    let document = assemble(&[]);
    assert_eq!(document.page_count(), 0);
}

#[test]
fn test_invalid_geometry_rejected_by_assembler() {
    let mut bad = geometry();
    bad.content_height = Decimal::ZERO;
    assert!(matches!(
        DocumentAssembler::new(bad),
        Err(ReportError::InvalidGeometry(_))
    ));
}

#[test]
fn test_assembly_is_deterministic() {
    let image = artifact(700);
    let sections = vec![
        Section::heading("Report", 1),
        Section::image(Some("Crop area".to_string()), image),
        Section::table("Records", columns(), rows(40)),
    ];
    let assembler = DocumentAssembler::new(geometry()).unwrap();
    assert_eq!(
        assembler.assemble(&sections).unwrap(),
        assembler.assemble(&sections).unwrap()
    );
}

proptest! {
    /// Every block lies inside the printable area and every artifact's
    /// slices partition its scaled height.
    #[test]
    fn test_blocks_stay_within_page(
        heading_count in 0usize..6,
        image_heights in prop::collection::vec(1u32..1500, 0..4),
        row_count in 0usize..120,
    ) {
        let geometry = geometry();
        let mut sections: Vec<Section> = (0..heading_count)
            .map(|i| Section::heading(format!("h{i}"), 2))
            .collect();
        let images: Vec<ArtifactMeta> = image_heights.iter().map(|h| artifact(*h)).collect();
        sections.extend(images.iter().map(|a| Section::image(None, *a)));
        sections.push(Section::table("Records", columns(), rows(row_count)));

        let document = assemble(&sections);

        for (index, page) in document.pages.iter().enumerate() {
            prop_assert_eq!(page.number as usize, index + 1);
            prop_assert!(!page.blocks.is_empty());
            for block in &page.blocks {
                let start = block.top() - geometry.top_margin;
                prop_assert!(start >= Decimal::ZERO);
                prop_assert!(start + block_height(&geometry, block) <= geometry.content_height);
            }
        }

        for image in &images {
            let total: Decimal = document
                .slices_of(image.id)
                .map(|(_, block)| match block {
                    Block::ImageSlice { height, .. } => *height,
                    _ => Decimal::ZERO,
                })
                .sum();
            prop_assert_eq!(total, Decimal::from(image.pixel_height));
        }

        let placed_rows: usize = data_fragments(&document).iter().map(|(_, n, _)| n).sum();
        prop_assert_eq!(placed_rows, row_count);
    }
}

// ============================================================================
// Templates
// ============================================================================

fn record(name: &str, area: Option<Decimal>) -> Record {
    Record {
        id: RecordId::new(),
        owner_id: OwnerId::new(),
        owner_label: name.to_string(),
        crop: Some("Wheat".to_string()),
        village: Some(" Pune ".to_string()),
        area,
        yield_kg: Some(dec!(1200.50)),
        latitude: dec!(18.52),
        longitude: dec!(73.85),
    }
}

#[test]
fn test_records_report_layout() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let image = artifact(100);
    let visual = CapturedVisual {
        caption: Some("Crop area".to_string()),
        artifact: image,
    };
    let records = vec![record("Asha", Some(dec!(2.50))), record("Ravi", None)];

    let sections = records_report(&records, &[visual], generated_at);
    let document = assemble(&sections);

    let first = &document.pages[0].blocks;
    assert!(matches!(&first[0], Block::Heading { text, level: 1, .. } if text == "AgroAnalytics Report"));
    assert!(matches!(
        &first[1],
        Block::Heading { text, .. } if text == "Generated on: 2024-03-01 09:30 UTC"
    ));
    assert_eq!(document.slices_of(image.id).count(), 1);

    let table_rows: Vec<Vec<String>> = document
        .pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| match b {
            Block::DataTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(table_rows.len(), 2);
    assert_eq!(table_rows[0][1], "Asha");
    assert_eq!(table_rows[0][2], "Pune");
    assert_eq!(table_rows[0][4], "2.5");
    assert_eq!(table_rows[0][5], "1200.5");
    assert_eq!(table_rows[1][4], "");
}

#[test]
fn test_records_report_without_records_shows_marker() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let document = assemble(&records_report(&[], &[], generated_at));

    assert_eq!(document.page_count(), 1);
    assert!(document.pages[0].blocks.iter().any(|b| matches!(
        b,
        Block::DataTable { empty_marker: Some(m), .. } if m == NO_RECORDS_MARKER
    )));
}

#[test]
fn test_dashboard_report_page_structure() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let summary = DashboardSummary {
        total_records: 3,
        total_area: dec!(12.50),
        average_yield: dec!(1500.00),
        total_villages: 2,
        total_crops: 2,
    };
    let villages = vec![
        VillageStats {
            village: "Pune".to_string(),
            count: 2,
            total_area: dec!(10.00),
            contribution_percent: Some(dec!(80.0)),
        },
        VillageStats {
            village: "Satara".to_string(),
            count: 1,
            total_area: dec!(0),
            contribution_percent: None,
        },
    ];
    let crops = DerivedSeries {
        view: ViewKind::CropArea,
        buckets: vec![
            Bucket {
                key: "Wheat".to_string(),
                count: 2,
                values: BucketValues::CropArea {
                    total_area: dec!(10.00),
                },
            },
            Bucket {
                key: "Rice".to_string(),
                count: 1,
                values: BucketValues::CropArea {
                    total_area: dec!(2.5),
                },
            },
        ],
    };
    let visual = artifact(120);

    let document = assemble(&dashboard_report(
        &summary,
        &crops,
        &villages,
        Some(visual),
        generated_at,
    ));

    assert_eq!(document.page_count(), 3);
    assert!(document.pages[0].blocks.iter().any(|b| matches!(
        b,
        Block::KeyValueTable { rows, .. }
            if rows.contains(&KeyValue::new("Total Farmers", "3"))
    )));
    assert!(document.pages[0].blocks.iter().any(|b| matches!(
        b,
        Block::Heading { text, .. } if text == CROP_AREA_TITLE
    )));
    let crop_rows = document.pages[0]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::DataTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(crop_rows, vec![vec!["Wheat", "2", "10"], vec!["Rice", "1", "2.5"]]);
    assert_eq!(
        document.slices_of(visual.id).map(|(page, _)| page).collect::<Vec<_>>(),
        vec![2]
    );

    let village_rows = document.pages[2]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::DataTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(village_rows[0], vec!["Pune", "2", "10.00", "80.0%"]);
    assert_eq!(village_rows[1][3], "n/a");
}

// ============================================================================
// Series tables
// ============================================================================

fn crop_record(crop: &str, village: &str, area: Decimal) -> Record {
    Record {
        crop: Some(crop.to_string()),
        village: Some(village.to_string()),
        ..record("Asha", Some(area))
    }
}

fn table_rows(document: &ReportDocument) -> Vec<Vec<String>> {
    document
        .pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| match b {
            Block::DataTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn test_series_table_keeps_bucket_order_across_pages() {
    // Thirty crops with repeated areas, so ties are broken by crop name.
    let records: Vec<Record> = (0..30)
        .map(|i| crop_record(&format!("Crop {i:02}"), "Pune", Decimal::from(i % 7)))
        .collect();
    let series =
        AggregationEngine::aggregate(&records, ViewKind::CropArea, &AggregateParams::default())
            .unwrap();

    let document = assemble(&[Section::from_series("Crop Area", &series)]);

    assert_eq!(data_fragments(&document), vec![(1, 22, false), (2, 8, true)]);
    let keys: Vec<String> = table_rows(&document)
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(keys, series.keys().collect::<Vec<_>>());
    assert_eq!(keys[0], "Crop 06");
    assert_eq!(keys[1], "Crop 13");
}

#[test]
fn test_series_table_columns_follow_view() {
    let records = vec![
        crop_record("Wheat", "Pune", dec!(2)),
        crop_record("Rice", "Pune", dec!(1)),
        crop_record("Wheat", "Satara", dec!(3)),
    ];
    let params = AggregateParams::default();

    let matrix =
        AggregationEngine::aggregate(&records, ViewKind::VillageCropMatrix, &params).unwrap();
    let section = Section::from_series("Crops by Village", &matrix);
    let document = assemble(&[section]);
    let Block::DataTable { columns, .. } = &document.pages[0].blocks[1] else {
        panic!("expected a data table");
    };
    assert_eq!(columns, &vec!["Village", "Rice", "Wheat", "Total"]);
    assert_eq!(
        table_rows(&document),
        vec![vec!["Pune", "1", "1", "2"], vec!["Satara", "0", "1", "1"]]
    );

    let share =
        AggregationEngine::aggregate(&records, ViewKind::CropSharePercent, &params).unwrap();
    let document = assemble(&[Section::from_series("Crop Share", &share)]);
    assert_eq!(
        table_rows(&document),
        vec![vec!["Wheat", "2", "66.7%"], vec!["Rice", "1", "33.3%"]]
    );
}

#[test]
fn test_empty_series_table_shows_marker() {
    let series = DerivedSeries::empty(ViewKind::VillageYield);
    let document = assemble(&[Section::from_series("Village Yield", &series)]);

    assert!(matches!(
        &document.pages[0].blocks[1],
        Block::DataTable { columns, empty_marker: Some(m), .. }
            if columns.len() == 4 && m == NO_RECORDS_MARKER
    ));
}
