//! Analytics routes.
//!
//! Every request carries its own record set, so the routes are stateless
//! apart from the configured defaults.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::AppState;
use agro_core::analytics::{
    AggregateParams, AggregationEngine, CropStats, DashboardSummary, SummaryService, VillageStats,
    ViewKind,
};
use agro_core::records::{Record, RecordFilter};

/// Creates the analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/views", get(list_views))
        .route("/analytics/summary", post(get_summary))
        .route("/analytics/{view}", post(get_view))
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Request body for analytics routes.
#[derive(Debug, Deserialize)]
pub struct AnalyticsRequest {
    /// Records to aggregate.
    pub records: Vec<Record>,
    /// Filter applied before aggregating.
    #[serde(default)]
    pub filter: RecordFilter,
    /// Maximum number of buckets or rows.
    pub limit: Option<usize>,
}

/// Response for the dashboard summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Headline figures.
    pub summary: DashboardSummary,
    /// Crops by total area.
    pub top_crops: Vec<CropStats>,
    /// Villages by record count.
    pub village_stats: Vec<VillageStats>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /analytics/views
async fn list_views() -> impl IntoResponse {
    let views: Vec<&'static str> = ViewKind::ALL.iter().map(ViewKind::as_str).collect();
    Json(views)
}

/// POST /analytics/{view}
async fn get_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Json(req): Json<AnalyticsRequest>,
) -> impl IntoResponse {
    let params = AggregateParams {
        limit: req.limit,
        label_threshold: state.config.analytics.label_threshold,
    };
    let records = req.filter.apply(&req.records);

    match AggregationEngine::aggregate_named(&records, &view, &params) {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /analytics/summary
async fn get_summary(
    State(state): State<AppState>,
    Json(req): Json<AnalyticsRequest>,
) -> impl IntoResponse {
    let limit = req.limit.unwrap_or(state.config.analytics.top_limit);
    let records = req.filter.apply(&req.records);

    let result = SummaryService::summarize(&records).and_then(|summary| {
        Ok(SummaryResponse {
            summary,
            top_crops: SummaryService::top_crops(&records, limit)?,
            village_stats: SummaryService::village_stats(&records, limit)?,
        })
    });

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}
