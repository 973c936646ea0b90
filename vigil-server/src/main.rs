//! Vigil Server
//!
//! Serves the run status of the monitored lambdas to the dashboard.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repository: Paged reads from CloudWatch Logs
//! - Service: Concurrent log fetching and status aggregation
//! - API: JSON endpoints over HTTP

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::segment::RunSegmenter;

pub mod api;
pub mod config;
pub mod repository;
pub mod service;

use crate::config::Config;
use crate::repository::{PagedLogSource, cloudwatch};
use crate::service::status_service::StatusService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vigil Server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    tracing::info!(
        "Monitoring {} flat process(es) and {} sub-run(s) of {}",
        config.flat_processes.len(),
        config.sub_runs.len(),
        config.publisher_function
    );

    let client = cloudwatch::connect(config.aws_region.clone()).await;
    let source = PagedLogSource::new(client, config.stream_limit, config.max_pages_per_stream);

    tracing::info!("CloudWatch Logs client initialized");

    let service = StatusService::new(
        Arc::new(source),
        config.targets(),
        RunSegmenter::new(config.header_matcher()?),
        config.schedule_policy()?,
    );

    // Build router with all API endpoints
    let app = api::create_router(Arc::new(service));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
