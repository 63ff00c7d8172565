//! Web UI Routes

use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Create the web UI router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Static assets
        .route("/static/*path", get(handlers::static_file))
        // Page routes
        .route("/", get(handlers::dashboard))
        .route("/accounts", get(handlers::accounts))
        // Session actions
        .route("/connect", post(handlers::connect))
        .route("/refresh", post(handlers::refresh))
        .route("/disconnect", post(handlers::disconnect))
        .route("/dismiss", post(handlers::dismiss))
        // JSON snapshot
        .route("/api/dashboard", get(handlers::dashboard_json))
        // Health check
        .route("/health", get(handlers::health))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
