//! Record routes: filtering, filter options, map markers, and CSV export.

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error_response;
use crate::AppState;
use agro_core::records::{
    CSV_FILENAME, MapView, Record, RecordFilter, distinct_crops, distinct_villages, export_csv,
};

/// Creates the record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/records/filter", post(filter_records))
        .route("/records/options", post(filter_options))
        .route("/records/map", post(map_view))
        .route("/records/csv", post(csv_export))
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Request body carrying a record set and an optional filter.
#[derive(Debug, Deserialize)]
pub struct RecordsRequest {
    /// Records to work on.
    pub records: Vec<Record>,
    /// Filter applied before anything else.
    #[serde(default)]
    pub filter: RecordFilter,
}

/// Values available in the filter dropdowns.
#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    /// Distinct crop labels, sorted.
    pub crops: Vec<String>,
    /// Distinct village labels, sorted.
    pub villages: Vec<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /records/filter
async fn filter_records(Json(req): Json<RecordsRequest>) -> impl IntoResponse {
    let filtered = req.filter.apply(&req.records);
    debug!(
        records = req.records.len(),
        matched = filtered.len(),
        "Filtered records"
    );
    Json(filtered)
}

/// POST /records/options
///
/// Options come from the unfiltered set.
async fn filter_options(Json(req): Json<RecordsRequest>) -> impl IntoResponse {
    Json(FilterOptionsResponse {
        crops: distinct_crops(&req.records),
        villages: distinct_villages(&req.records),
    })
}

/// POST /records/map
async fn map_view(Json(req): Json<RecordsRequest>) -> impl IntoResponse {
    let filtered = req.filter.apply(&req.records);
    Json(MapView::from_records(&filtered))
}

/// POST /records/csv
///
/// Exports the filtered records as a CSV download.
async fn csv_export(Json(req): Json<RecordsRequest>) -> Response {
    let filtered = req.filter.apply(&req.records);
    match export_csv(&filtered) {
        Ok(body) => {
            info!(records = filtered.len(), bytes = body.len(), "Exported records as CSV");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{CSV_FILENAME}\""),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
