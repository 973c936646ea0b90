//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific concern.

pub mod error;
pub mod health;
pub mod status;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::status_service::StatusService;

/// Create the main API router with all endpoints
pub fn create_router(service: Arc<StatusService>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Status endpoints
        .route("/status", get(status::get_statuses))
        .route("/status/{name}", get(status::get_process_status))
        .route("/processes", get(status::list_processes))
        // Add state and middleware
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
