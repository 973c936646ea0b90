//! Status Service
//!
//! Builds the status map of every monitored process: fetches the logs of all
//! flat processes and of the publisher concurrently, then hands them to the
//! core aggregation.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use thiserror::Error;
use vigil_core::domain::{LogLine, ProcessName, ProcessRegistry, ProcessStatus, ProcessStatusMap};
use vigil_core::segment::RunSegmenter;
use vigil_core::status::{SchedulePolicy, aggregate};

use crate::repository::{FetchError, LogSource};

/// Service error type
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to fetch logs for {process}: {source}")]
    FetchFailure {
        process: ProcessName,
        #[source]
        source: FetchError,
    },

    #[error("unknown process {0}")]
    UnknownProcess(ProcessName),
}

pub type Result<T> = std::result::Result<T, StatusError>;

/// A process and the log group its lines are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTarget {
    pub name: ProcessName,
    pub log_group: String,
}

impl ProcessTarget {
    pub fn new(name: impl Into<ProcessName>, log_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log_group: log_group.into(),
        }
    }
}

/// Where every monitored process logs to
#[derive(Debug, Clone)]
pub struct ProcessTargets {
    /// Processes reported as a whole
    pub flat: Vec<ProcessTarget>,
    /// The multiplexed process whose stream is segmented into sub-runs
    pub publisher: ProcessTarget,
    /// Sub-runs expected inside the publisher's stream
    pub sub_runs: Vec<ProcessName>,
}

impl ProcessTargets {
    pub fn registry(&self) -> ProcessRegistry {
        ProcessRegistry::new(
            self.flat.iter().map(|target| target.name.clone()).collect(),
            self.sub_runs.clone(),
        )
    }
}

/// Computes process statuses from the log store
pub struct StatusService {
    source: Arc<dyn LogSource>,
    targets: ProcessTargets,
    registry: ProcessRegistry,
    segmenter: RunSegmenter,
    schedule: SchedulePolicy,
}

impl StatusService {
    pub fn new(
        source: Arc<dyn LogSource>,
        targets: ProcessTargets,
        segmenter: RunSegmenter,
        schedule: SchedulePolicy,
    ) -> Self {
        let registry = targets.registry();
        Self {
            source,
            targets,
            registry,
            segmenter,
            schedule,
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Computes the status of every registered process
    ///
    /// All log groups are read concurrently. If any read fails the whole
    /// computation fails: a partial map would show unread processes as never
    /// having run.
    pub async fn compute_process_statuses(&self) -> Result<ProcessStatusMap> {
        let flat = try_join_all(self.targets.flat.iter().map(|target| async move {
            let lines = self.fetch(target).await?;
            Ok::<_, StatusError>((target.name.clone(), lines))
        }));
        let publisher = self.fetch(&self.targets.publisher);

        let (flat, multiplexed) = tokio::try_join!(flat, publisher)?;

        let statuses = aggregate(&self.registry, &self.segmenter, flat, multiplexed);

        tracing::debug!("Computed status of {} process(es)", statuses.len());

        Ok(self.schedule.apply(statuses, Utc::now()))
    }

    /// Computes the status of a single process
    pub async fn process_status(&self, name: &str) -> Result<ProcessStatus> {
        let mut statuses = self.compute_process_statuses().await?;

        statuses
            .remove(name)
            .ok_or_else(|| StatusError::UnknownProcess(ProcessName::from(name)))
    }

    async fn fetch(&self, target: &ProcessTarget) -> Result<Vec<LogLine>> {
        tracing::debug!("Fetching logs for {} from {}", target.name, target.log_group);

        self.source
            .fetch_logs(&target.log_group)
            .await
            .map_err(|source| {
                tracing::error!("Failed to fetch logs for {}: {}", target.name, source);
                StatusError::FetchFailure {
                    process: target.name.clone(),
                    source,
                }
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use std::collections::HashMap;
    use vigil_core::domain::registry::DEFAULT_SUB_RUNS;

    /// In-memory log source keyed by log group
    #[derive(Default)]
    pub(crate) struct FakeLogSource {
        pub(crate) groups: HashMap<String, Vec<LogLine>>,
        pub(crate) failing: Option<String>,
    }

    #[async_trait]
    impl LogSource for FakeLogSource {
        async fn fetch_logs(
            &self,
            log_group: &str,
        ) -> std::result::Result<Vec<LogLine>, FetchError> {
            if self.failing.as_deref() == Some(log_group) {
                return Err(FetchError::store(log_group, "throttled"));
            }
            Ok(self.groups.get(log_group).cloned().unwrap_or_default())
        }
    }

    pub(crate) fn targets() -> ProcessTargets {
        ProcessTargets {
            flat: vec![
                ProcessTarget::new("fetcher", "/aws/lambda/fetcher"),
                ProcessTarget::new("refresh", "/aws/lambda/refresh"),
                ProcessTarget::new("dump", "/aws/lambda/dump"),
            ],
            publisher: ProcessTarget::new("publisher", "/aws/lambda/publisher"),
            sub_runs: DEFAULT_SUB_RUNS.into_iter().map(ProcessName::from).collect(),
        }
    }

    pub(crate) fn lines_since(start: DateTime<Utc>, messages: &[&str]) -> Vec<LogLine> {
        messages
            .iter()
            .enumerate()
            .map(|(i, message)| LogLine::new(start + Duration::seconds(i as i64), *message))
            .collect()
    }

    pub(crate) fn service(source: FakeLogSource, schedule: SchedulePolicy) -> StatusService {
        StatusService::new(
            Arc::new(source),
            targets(),
            RunSegmenter::default(),
            schedule,
        )
    }

    #[tokio::test]
    async fn test_statuses_cover_registry_without_logs() {
        let service = service(FakeLogSource::default(), SchedulePolicy::default());

        let statuses = service.compute_process_statuses().await.unwrap();

        assert_eq!(statuses.len(), 12);
        assert!(statuses.values().all(|status| !status.success));
        assert!(!statuses.contains_key("publisher"));
    }

    #[tokio::test]
    async fn test_flat_and_sub_run_statuses() {
        let start = Utc::now() - Duration::minutes(1);
        let mut source = FakeLogSource::default();
        source.groups.insert(
            "/aws/lambda/fetcher".to_string(),
            lines_since(start, &["START RequestId: f", "fetched 4 events", "REPORT RequestId: f"]),
        );
        source.groups.insert(
            "/aws/lambda/publisher".to_string(),
            lines_since(
                start,
                &[
                    "START RequestId: a",
                    "5min|bluesky",
                    "posted",
                    "REPORT RequestId: a",
                    "START RequestId: b",
                    "5min|twitter",
                    "Error: 429",
                    "REPORT RequestId: b",
                ],
            ),
        );

        let service = service(source, SchedulePolicy::default());
        let statuses = service.compute_process_statuses().await.unwrap();

        assert!(statuses["fetcher"].success);
        assert!(statuses["5min|bluesky"].success);
        assert!(!statuses["5min|twitter"].success);
        assert_eq!(statuses["5min|twitter"].logs[0].message, "REPORT RequestId: b");
        assert!(statuses["daily|threads"].logs.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_whole_computation() {
        let source = FakeLogSource {
            failing: Some("/aws/lambda/refresh".to_string()),
            ..Default::default()
        };
        let service = service(source, SchedulePolicy::default());

        let err = service.compute_process_statuses().await.unwrap_err();

        assert!(matches!(
            err,
            StatusError::FetchFailure { ref process, .. } if process.as_str() == "refresh"
        ));
    }

    #[tokio::test]
    async fn test_publisher_failure_fails_whole_computation() {
        let source = FakeLogSource {
            failing: Some("/aws/lambda/publisher".to_string()),
            ..Default::default()
        };
        let service = service(source, SchedulePolicy::default());

        let result = service.compute_process_statuses().await;
        assert!(matches!(result, Err(StatusError::FetchFailure { .. })));
    }

    #[tokio::test]
    async fn test_lateness_is_applied() {
        let mut source = FakeLogSource::default();
        source.groups.insert(
            "/aws/lambda/dump".to_string(),
            lines_since(Utc::now() - Duration::days(3), &["START", "dumped", "REPORT"]),
        );
        let schedule = SchedulePolicy::new(Duration::minutes(10))
            .with_interval("dump", Duration::days(1))
            .with_interval("fetcher", Duration::minutes(5));

        let service = service(source, schedule);
        let statuses = service.compute_process_statuses().await.unwrap();

        assert!(statuses["dump"].success);
        assert!(statuses["dump"].is_late);
        assert!(statuses["fetcher"].is_late);
        assert!(!statuses["refresh"].is_late);
    }

    #[tokio::test]
    async fn test_single_process_status() {
        let service = service(FakeLogSource::default(), SchedulePolicy::default());

        let status = service.process_status("weekly|twitter").await.unwrap();
        assert!(!status.success);

        let result = service.process_status("nightly").await;
        assert!(matches!(result, Err(StatusError::UnknownProcess(_))));
    }
}
