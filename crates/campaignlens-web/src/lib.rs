//! CampaignLens Web UI
//!
//! Server-rendered campaign analytics dashboard.

mod handlers;
mod routes;
mod templates;

use axum::Router;
use campaignlens_common::config::WebConfig;
use campaignlens_core::Connector;
use rust_embed::RustEmbed;
use std::sync::Arc;

/// Static files for the web UI
#[derive(RustEmbed)]
#[folder = "static/"]
pub struct StaticAssets;

/// Application state for the web UI
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<Connector>,
    pub templates: Arc<templates::Templates>,
}

impl AppState {
    /// Create a new app state
    pub fn new(connector: Arc<Connector>) -> Self {
        Self {
            connector,
            templates: Arc::new(templates::Templates::new()),
        }
    }
}

/// Create the web UI router
pub fn create_router(state: AppState) -> Router {
    routes::create_router(state)
}

/// Run the web UI server
pub async fn run(config: WebConfig, connector: Arc<Connector>) -> anyhow::Result<()> {
    let state = AppState::new(connector);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Web UI listening on {}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
