//! Status API Handlers
//!
//! HTTP endpoints serving process statuses to the dashboard.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use vigil_core::domain::{ProcessStatus, ProcessStatusMap};
use vigil_core::dto::ProcessList;

use crate::api::error::ApiResult;
use crate::service::status_service::StatusService;

/// GET /status
/// Status of every monitored process
pub async fn get_statuses(
    State(service): State<Arc<StatusService>>,
) -> ApiResult<Json<ProcessStatusMap>> {
    tracing::debug!("Computing process statuses");

    let statuses = service.compute_process_statuses().await?;

    Ok(Json(statuses))
}

/// GET /status/{name}
/// Status of a single process
pub async fn get_process_status(
    State(service): State<Arc<StatusService>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ProcessStatus>> {
    tracing::debug!("Computing status of {}", name);

    let status = service.process_status(&name).await?;

    Ok(Json(status))
}

/// GET /processes
/// The monitored processes
pub async fn list_processes(State(service): State<Arc<StatusService>>) -> Json<ProcessList> {
    Json(ProcessList::from(service.registry()))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use vigil_core::dto::ErrorResponse;
    use vigil_core::status::SchedulePolicy;

    use super::*;
    use crate::api::create_router;
    use crate::service::status::tests::{FakeLogSource, lines_since, service};

    async fn get(source: FakeLogSource, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = create_router(Arc::new(service(source, SchedulePolicy::default())));

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _) = get(FakeLogSource::default(), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_statuses_returns_full_map() {
        let mut source = FakeLogSource::default();
        source.groups.insert(
            "/aws/lambda/publisher".to_string(),
            lines_since(
                Utc::now() - Duration::minutes(2),
                &["START RequestId A", "daily|bluesky", "log line 1", "REPORT A"],
            ),
        );

        let (status, json) = get(source, "/status").await;

        assert_eq!(status, StatusCode::OK);
        let statuses: ProcessStatusMap = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(statuses.len(), 12);
        assert_eq!(json["daily|bluesky"]["success"], true);
        assert_eq!(json["daily|bluesky"]["isLate"], false);
        assert_eq!(json["daily|bluesky"]["logs"][0]["message"], "REPORT A");
        assert!(json["daily|bluesky"]["lastRun"].is_string());
        assert_eq!(json["daily|threads"]["success"], false);
        assert!(json["daily|threads"].get("lastRun").is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_structured_bad_gateway() {
        let source = FakeLogSource {
            failing: Some("/aws/lambda/fetcher".to_string()),
            ..Default::default()
        };

        let (status, json) = get(source, "/status").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let error: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(error.error, "FetchFailure");
        assert!(error.message.contains("fetcher"));
    }

    #[tokio::test]
    async fn test_single_status_with_encoded_name() {
        let (status, json) = get(FakeLogSource::default(), "/status/weekly%7Cthreads").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["logs"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_process_is_not_found() {
        let (status, json) = get(FakeLogSource::default(), "/status/nightly").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "UnknownProcess");
    }

    #[tokio::test]
    async fn test_list_processes() {
        let (status, json) = get(FakeLogSource::default(), "/processes").await;

        assert_eq!(status, StatusCode::OK);
        let list: ProcessList = serde_json::from_value(json).unwrap();
        assert_eq!(list.flat.len(), 3);
        assert_eq!(list.sub_runs.len(), 9);
    }
}
