//! Report routes.
//!
//! Artifacts are referenced by their metadata only; the document returned
//! here is the page layout a document writer turns into the final file.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::error_response;
use crate::AppState;
use agro_core::analytics::{AggregateParams, AggregationEngine, SummaryService, ViewKind};
use agro_core::records::{Record, RecordFilter};
use agro_core::report::templates::{CapturedVisual, dashboard_report, records_report};
use agro_core::report::{ArtifactMeta, DocumentAssembler, PageGeometry, Section};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/assemble", post(assemble_report))
        .route("/reports/records", post(records_document))
        .route("/reports/dashboard", post(dashboard_document))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for free-form assembly.
#[derive(Debug, Deserialize)]
pub struct AssembleRequest {
    /// Page geometry; the configured one when omitted.
    pub geometry: Option<PageGeometry>,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

/// Request body for the records report.
#[derive(Debug, Deserialize)]
pub struct RecordsReportRequest {
    /// Records to list.
    pub records: Vec<Record>,
    /// Filter applied before listing.
    #[serde(default)]
    pub filter: RecordFilter,
    /// Visuals already rendered by the client, in display order.
    #[serde(default)]
    pub visuals: Vec<CapturedVisual>,
}

/// Request body for the dashboard report.
#[derive(Debug, Deserialize)]
pub struct DashboardReportRequest {
    /// Records to summarize.
    pub records: Vec<Record>,
    /// Filter applied before summarizing.
    #[serde(default)]
    pub filter: RecordFilter,
    /// Rendered dashboard visual.
    pub visual: Option<ArtifactMeta>,
    /// Maximum number of crop and village rows.
    pub limit: Option<usize>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn assemble(geometry: PageGeometry, sections: &[Section]) -> Response {
    let document = DocumentAssembler::new(geometry).and_then(|a| a.assemble(sections));
    match document {
        Ok(document) => {
            info!(pages = document.page_count(), "Report assembled");
            (StatusCode::OK, Json(document)).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /reports/assemble
async fn assemble_report(
    State(state): State<AppState>,
    Json(req): Json<AssembleRequest>,
) -> impl IntoResponse {
    let geometry = req
        .geometry
        .unwrap_or_else(|| state.geometry.as_ref().clone());
    assemble(geometry, &req.sections)
}

/// POST /reports/records
async fn records_document(
    State(state): State<AppState>,
    Json(req): Json<RecordsReportRequest>,
) -> impl IntoResponse {
    let records = req.filter.apply(&req.records);
    let sections = records_report(&records, &req.visuals, Utc::now());
    assemble(state.geometry.as_ref().clone(), &sections)
}

/// POST /reports/dashboard
async fn dashboard_document(
    State(state): State<AppState>,
    Json(req): Json<DashboardReportRequest>,
) -> impl IntoResponse {
    let limit = req.limit.unwrap_or(state.config.analytics.top_limit);
    let records = req.filter.apply(&req.records);

    let params = AggregateParams::default().with_limit(limit);
    let figures = SummaryService::summarize(&records).and_then(|summary| {
        let crops = AggregationEngine::aggregate(&records, ViewKind::CropArea, &params)?;
        let villages = SummaryService::village_stats(&records, limit)?;
        Ok((summary, crops, villages))
    });
    let (summary, crops, villages) = match figures {
        Ok(figures) => figures,
        Err(e) => return error_response(e),
    };

    let sections = dashboard_report(&summary, &crops, &villages, req.visual, Utc::now());
    assemble(state.geometry.as_ref().clone(), &sections)
}
