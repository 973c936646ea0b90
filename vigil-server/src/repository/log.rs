//! Log repository
//!
//! Reads the recent log lines of one log group, page by page, and returns them
//! as a single ascending sequence.

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use vigil_core::domain::LogLine;

/// Platform lines that carry no information for status derivation.
/// `START RequestId` and `REPORT` are kept: segmentation relies on them.
const NOISE_PREFIXES: [&str; 3] = ["INIT_START", "INIT_REPORT", "END RequestId"];

/// Errors raised while reading the log store
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("log store request for {log_group} failed: {message}")]
    Store { log_group: String, message: String },
}

impl FetchError {
    pub fn store(log_group: &str, message: impl std::fmt::Display) -> Self {
        Self::Store {
            log_group: log_group.to_string(),
            message: message.to_string(),
        }
    }
}

/// Source of ordered log lines for a process
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetches the recent lines of `log_group`, oldest first
    ///
    /// Fails as a whole rather than returning a partial sequence.
    async fn fetch_logs(&self, log_group: &str) -> Result<Vec<LogLine>, FetchError>;
}

/// One page of a log stream
#[derive(Debug, Clone, Default)]
pub struct LogPage {
    /// Lines of this page, oldest first
    pub lines: Vec<LogLine>,
    /// Token of the next (older) page
    pub next_token: Option<String>,
}

/// Minimal paging surface of a log store
#[async_trait]
pub trait LogPageBackend: Send + Sync {
    /// Names of the most recently written streams of `log_group`
    async fn recent_streams(&self, log_group: &str, limit: i32) -> Result<Vec<String>, FetchError>;

    /// Reads one page, starting from the newest page when `token` is `None`
    async fn page(
        &self,
        log_group: &str,
        stream: &str,
        token: Option<String>,
    ) -> Result<LogPage, FetchError>;
}

/// `LogSource` that walks backwards through the recent streams of a group
pub struct PagedLogSource<B> {
    backend: B,
    stream_limit: i32,
    max_pages_per_stream: usize,
}

impl<B: LogPageBackend> PagedLogSource<B> {
    pub fn new(backend: B, stream_limit: i32, max_pages_per_stream: usize) -> Self {
        Self {
            backend,
            stream_limit,
            max_pages_per_stream,
        }
    }

    /// Reads one stream from its newest page backwards
    ///
    /// Pages are requested one after the other, each with the token returned
    /// by the previous one. The store signals the end by handing back the
    /// token it was given.
    async fn fetch_stream(
        &self,
        log_group: &str,
        stream: &str,
    ) -> Result<Vec<LogLine>, FetchError> {
        let mut pages = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..self.max_pages_per_stream {
            let page = self.backend.page(log_group, stream, token.clone()).await?;
            pages.push(page.lines);

            match page.next_token {
                Some(next) if token.as_deref() != Some(next.as_str()) => token = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Read {} page(s) from {}/{}", pages.len(), log_group, stream);

        pages.reverse();
        Ok(pages.into_iter().flatten().collect())
    }
}

#[async_trait]
impl<B: LogPageBackend> LogSource for PagedLogSource<B> {
    async fn fetch_logs(&self, log_group: &str) -> Result<Vec<LogLine>, FetchError> {
        let streams = self
            .backend
            .recent_streams(log_group, self.stream_limit)
            .await?;

        tracing::debug!("Fetching {} stream(s) of {}", streams.len(), log_group);

        let per_stream =
            try_join_all(streams.iter().map(|stream| self.fetch_stream(log_group, stream))).await?;

        let mut lines: Vec<LogLine> = per_stream
            .into_iter()
            .flatten()
            .filter(|line| !is_noise(&line.message))
            .collect();
        lines.sort_by_key(|line| line.timestamp);

        Ok(lines)
    }
}

fn is_noise(message: &str) -> bool {
    NOISE_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn line(second: i64, message: &str) -> LogLine {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        LogLine::new(base + Duration::seconds(second), message)
    }

    /// Serves pages from memory, newest page first, like the real store
    #[derive(Default)]
    struct FakeBackend {
        streams: Vec<String>,
        pages: HashMap<(String, Option<String>), LogPage>,
        requests: Mutex<Vec<Option<String>>>,
        fail: bool,
    }

    impl FakeBackend {
        fn with_page(
            mut self,
            stream: &str,
            token: Option<&str>,
            lines: Vec<LogLine>,
            next_token: &str,
        ) -> Self {
            if !self.streams.iter().any(|s| s == stream) {
                self.streams.push(stream.to_string());
            }
            self.pages.insert(
                (stream.to_string(), token.map(str::to_string)),
                LogPage {
                    lines,
                    next_token: Some(next_token.to_string()),
                },
            );
            self
        }
    }

    #[async_trait]
    impl LogPageBackend for FakeBackend {
        async fn recent_streams(
            &self,
            log_group: &str,
            _limit: i32,
        ) -> Result<Vec<String>, FetchError> {
            if self.fail {
                return Err(FetchError::store(log_group, "access denied"));
            }
            Ok(self.streams.clone())
        }

        async fn page(
            &self,
            _log_group: &str,
            stream: &str,
            token: Option<String>,
        ) -> Result<LogPage, FetchError> {
            self.requests.lock().unwrap().push(token.clone());
            Ok(self
                .pages
                .get(&(stream.to_string(), token.clone()))
                .cloned()
                .unwrap_or(LogPage {
                    lines: Vec::new(),
                    next_token: token,
                }))
        }
    }

    fn messages(lines: &[LogLine]) -> Vec<&str> {
        lines.iter().map(|line| line.message.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_are_reversed_into_ascending_order() {
        let backend = FakeBackend::default()
            .with_page("s1", None, vec![line(4, "c"), line(5, "REPORT")], "b1")
            .with_page("s1", Some("b1"), vec![line(2, "a"), line(3, "b")], "b2");
        let source = PagedLogSource::new(backend, 10, 20);

        let lines = source.fetch_logs("/aws/lambda/publisher").await.unwrap();
        assert_eq!(messages(&lines), vec!["a", "b", "c", "REPORT"]);
    }

    #[tokio::test]
    async fn test_pagination_stops_on_repeated_token() {
        let backend = FakeBackend::default()
            .with_page("s1", None, vec![line(2, "newest")], "b1")
            .with_page("s1", Some("b1"), vec![line(1, "oldest")], "b1");
        let source = PagedLogSource::new(backend, 10, 20);

        let lines = source.fetch_logs("group").await.unwrap();
        assert_eq!(messages(&lines), vec!["oldest", "newest"]);

        let requests = source.backend.requests.lock().unwrap().clone();
        assert_eq!(requests, vec![None, Some("b1".to_string())]);
    }

    #[tokio::test]
    async fn test_pagination_is_bounded() {
        let backend = FakeBackend::default()
            .with_page("s1", None, vec![line(3, "p0")], "t1")
            .with_page("s1", Some("t1"), vec![line(2, "p1")], "t2")
            .with_page("s1", Some("t2"), vec![line(1, "p2")], "t3");
        let source = PagedLogSource::new(backend, 10, 2);

        let lines = source.fetch_logs("group").await.unwrap();
        assert_eq!(messages(&lines), vec!["p1", "p0"]);
    }

    #[tokio::test]
    async fn test_streams_are_merged_by_timestamp() {
        let backend = FakeBackend::default()
            .with_page("s1", None, vec![line(1, "one"), line(3, "three")], "x")
            .with_page("s2", None, vec![line(2, "two"), line(4, "four")], "y");
        let source = PagedLogSource::new(backend, 10, 1);

        let lines = source.fetch_logs("group").await.unwrap();
        assert_eq!(messages(&lines), vec!["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn test_noise_is_filtered_but_anchors_are_kept() {
        let backend = FakeBackend::default().with_page(
            "s1",
            None,
            vec![
                line(1, "INIT_START Runtime Version: nodejs:20"),
                line(2, "START RequestId: a Version: $LATEST"),
                line(3, "daily|bluesky"),
                line(4, "END RequestId: a"),
                line(5, "REPORT RequestId: a Duration: 12 ms"),
            ],
            "done",
        );
        let source = PagedLogSource::new(backend, 10, 1);

        let lines = source.fetch_logs("group").await.unwrap();
        assert_eq!(
            messages(&lines),
            vec![
                "START RequestId: a Version: $LATEST",
                "daily|bluesky",
                "REPORT RequestId: a Duration: 12 ms",
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let backend = FakeBackend {
            fail: true,
            ..Default::default()
        };
        let source = PagedLogSource::new(backend, 10, 20);

        let result = source.fetch_logs("group").await;
        assert!(matches!(result, Err(FetchError::Store { .. })));
    }
}
