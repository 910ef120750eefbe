//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Analytics routes over caller-supplied record sets
//! - Report assembly routes
//! - JSON error responses mapped from core errors

pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use agro_core::report::PageGeometry;
use agro_shared::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded application configuration.
    pub config: Arc<AppConfig>,
    /// Default page geometry for report assembly.
    pub geometry: Arc<PageGeometry>,
}

impl AppState {
    /// Builds state from configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let geometry = PageGeometry::from(&config.report);
        Self {
            config: Arc::new(config),
            geometry: Arc::new(geometry),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests;
