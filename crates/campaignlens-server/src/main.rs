//! CampaignLens - campaign analytics dashboard entry point

use anyhow::Result;
use campaignlens_common::config::{Config, LoggingConfig};
use campaignlens_core::{CampaignClient, Connector};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting CampaignLens dashboard...");
    info!("Campaign API at {}", config.provider.base_url);

    // Initialize connector
    let client = CampaignClient::new(&config)?;
    let connector = Arc::new(Connector::new(client));

    // Start Web UI server
    let web_handle = {
        let web_config = config.web.clone();
        let connector = connector.clone();
        info!("Starting Web UI server on {}", web_config.bind);

        tokio::spawn(async move {
            if let Err(e) = campaignlens_web::run(web_config, connector).await {
                tracing::error!("Web UI server error: {}", e);
            }
        })
    };

    info!("CampaignLens started successfully");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    web_handle.abort();

    info!("CampaignLens shutdown complete");

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_json() {
        registry
            .with(fmt::layer().json().with_target(true).with_level(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
