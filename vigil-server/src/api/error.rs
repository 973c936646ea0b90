//! API Error Handling
//!
//! Converts service errors into structured `{ error, message }` responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use vigil_core::dto::ErrorResponse;

use crate::service::status_service::StatusError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// The log store could not be read
    FetchFailure(String),
    NotFound(String),
}

impl ApiError {
    fn name(&self) -> &'static str {
        match self {
            ApiError::FetchFailure(_) => "FetchFailure",
            ApiError::NotFound(_) => "UnknownProcess",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.name().to_string();
        let (status, message) = match self {
            ApiError::FetchFailure(msg) => {
                tracing::error!("Log fetch failed: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::FetchFailure { .. } => ApiError::FetchFailure(err.to_string()),
            StatusError::UnknownProcess(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
