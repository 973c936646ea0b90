//! Health Check API Handler

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Liveness probe; answers without touching the log store
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
