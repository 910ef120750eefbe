//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use agro_shared::AppConfig;

use crate::{AppState, create_router};

fn app() -> axum::Router {
    create_router(AppState::new(AppConfig::default()))
}

fn record(crop: &str, village: &str, area: &str, yield_kg: &str) -> Value {
    json!({
        "id": uuid::Uuid::now_v7(),
        "owner_id": uuid::Uuid::now_v7(),
        "owner_label": "Asha",
        "crop": crop,
        "village": village,
        "area": area,
        "yield_kg": yield_kg,
        "latitude": "18.52",
        "longitude": "73.85",
    })
}

fn sample_records() -> Value {
    json!([
        record("Wheat", "Pune", "2", "1000"),
        record("Rice", "Pune", "3", "900"),
        record("Wheat", "Satara", "4", "1500"),
    ])
}

async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send("GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_views() {
    let (status, body) = send("GET", "/api/v1/analytics/views", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(6));
}

#[rstest]
#[case("crop_area")]
#[case("crop-yield-per-area")]
#[case("crop_share_percent")]
#[case("village_crop_matrix")]
#[case("village_yield")]
#[case("area_yield_pairs")]
#[tokio::test]
async fn test_every_view_aggregates(#[case] view: &str) {
    let (status, body) = send(
        "POST",
        &format!("/api/v1/analytics/{view}"),
        Some(json!({ "records": sample_records() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["buckets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_crop_area_sorted_and_limited() {
    let (status, body) = send(
        "POST",
        "/api/v1/analytics/crop_area",
        Some(json!({ "records": sample_records(), "limit": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let buckets = body["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["key"], "Wheat");
    assert_eq!(buckets[0]["count"], 2);
}

#[tokio::test]
async fn test_filter_applies_before_aggregation() {
    let (status, body) = send(
        "POST",
        "/api/v1/analytics/crop_area",
        Some(json!({ "records": sample_records(), "filter": { "village": "Pune" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["Rice", "Wheat"]);
}

#[tokio::test]
async fn test_unknown_view_is_not_found() {
    let (status, body) = send(
        "POST",
        "/api/v1/analytics/rainfall",
        Some(json!({ "records": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_record_is_validation_error() {
    let mut records = sample_records();
    records[1]["area"] = Value::Null;
    let (status, body) = send(
        "POST",
        "/api/v1/analytics/crop_area",
        Some(json!({ "records": records })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_summary() {
    let (status, body) = send(
        "POST",
        "/api/v1/analytics/summary",
        Some(json!({ "records": sample_records() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_records"], 3);
    assert_eq!(body["summary"]["total_villages"], 2);
    assert_eq!(body["top_crops"][0]["crop"], "Wheat");
    assert_eq!(body["village_stats"][0]["village"], "Pune");
}

#[tokio::test]
async fn test_filter_options_and_map() {
    let (status, body) = send(
        "POST",
        "/api/v1/records/options",
        Some(json!({ "records": sample_records() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crops"], json!(["Rice", "Wheat"]));
    assert_eq!(body["villages"], json!(["Pune", "Satara"]));

    let (status, body) = send(
        "POST",
        "/api/v1/records/map",
        Some(json!({ "records": sample_records(), "filter": { "crop": "Wheat" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markers"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_assemble_empty_table() {
    let (status, body) = send(
        "POST",
        "/api/v1/reports/assemble",
        Some(json!({
            "sections": [{
                "title": "Records",
                "body": { "type": "table", "columns": ["ID", "Name"], "rows": [] }
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["blocks"][1]["empty_marker"], "No records");
}

#[tokio::test]
async fn test_assemble_rejects_unrenderable_artifact() {
    let (status, body) = send(
        "POST",
        "/api/v1/reports/assemble",
        Some(json!({
            "sections": [{
                "body": {
                    "type": "image",
                    "artifact": { "id": uuid::Uuid::now_v7(), "pixel_width": 0, "pixel_height": 10 }
                }
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_dashboard_document() {
    let (status, body) = send(
        "POST",
        "/api/v1/reports/dashboard",
        Some(json!({ "records": sample_records() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Key metrics and crop area, then village statistics on a fresh page.
    assert_eq!(body["pages"].as_array().map(Vec::len), Some(2));

    let crop_table = body["pages"][0]["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["type"] == "data_table")
        .unwrap();
    assert_eq!(crop_table["rows"], json!([["Wheat", "2", "6"], ["Rice", "1", "3"]]));
}

#[tokio::test]
async fn test_assemble_rejects_out_of_range_image() {
    let (status, body) = send(
        "POST",
        "/api/v1/reports/assemble",
        Some(json!({
            "geometry": {
                "content_width": "79228162514264337593543950335",
                "content_height": "257",
                "top_margin": "20",
                "header_height": "8",
                "row_height": "7",
                "heading_height": "10"
            },
            "sections": [{
                "body": {
                    "type": "image",
                    "artifact": { "id": uuid::Uuid::now_v7(), "pixel_width": 1, "pixel_height": 2 }
                }
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_records_csv_download() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/records/csv")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "records": sample_records(), "filter": { "village": "Pune" } }).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"farmer_data.csv\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(r#""ID","Farmer Name""#));
    assert!(lines[1].contains(r#""Asha","Pune","Wheat",2,1000"#));
}

#[tokio::test]
async fn test_records_csv_without_matches_is_rejected() {
    let (status, body) = send(
        "POST",
        "/api/v1/records/csv",
        Some(json!({ "records": sample_records(), "filter": { "crop": "Cotton" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("No data to export"));
}

#[tokio::test]
async fn test_records_document() {
    let (status, body) = send(
        "POST",
        "/api/v1/reports/records",
        Some(json!({
            "records": sample_records(),
            "visuals": [{
                "caption": "Crop area",
                "artifact": { "id": uuid::Uuid::now_v7(), "pixel_width": 182, "pixel_height": 100 }
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pages"][0]["blocks"][0]["text"], "AgroAnalytics Report");
}
