//! CloudWatch Logs backend
//!
//! Lambda output lands in CloudWatch Logs, one log group per function and one
//! stream per execution environment.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::{OrderBy, OutputLogEvent};
use chrono::DateTime;
use vigil_core::domain::LogLine;

use crate::repository::log::{FetchError, LogPage, LogPageBackend};

/// Creates a CloudWatch Logs client from the default AWS configuration chain
pub async fn connect(region: Option<String>) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }

    let shared_config = loader.load().await;
    Client::new(&shared_config)
}

#[async_trait]
impl LogPageBackend for Client {
    async fn recent_streams(&self, log_group: &str, limit: i32) -> Result<Vec<String>, FetchError> {
        let output = self
            .describe_log_streams()
            .log_group_name(log_group)
            .order_by(OrderBy::LastEventTime)
            .descending(true)
            .limit(limit)
            .send()
            .await
            .map_err(|e| FetchError::store(log_group, DisplayErrorContext(&e)))?;

        Ok(output
            .log_streams()
            .iter()
            .filter_map(|stream| stream.log_stream_name().map(str::to_string))
            .collect())
    }

    async fn page(
        &self,
        log_group: &str,
        stream: &str,
        token: Option<String>,
    ) -> Result<LogPage, FetchError> {
        let output = self
            .get_log_events()
            .log_group_name(log_group)
            .log_stream_name(stream)
            .start_from_head(false)
            .set_next_token(token)
            .send()
            .await
            .map_err(|e| FetchError::store(log_group, DisplayErrorContext(&e)))?;

        let lines = output
            .events()
            .iter()
            .filter_map(|event| to_log_line(log_group, event))
            .collect();

        Ok(LogPage {
            lines,
            next_token: output.next_backward_token().map(str::to_string),
        })
    }
}

fn to_log_line(log_group: &str, event: &OutputLogEvent) -> Option<LogLine> {
    let Some(timestamp) = event.timestamp().and_then(DateTime::from_timestamp_millis) else {
        tracing::warn!("Skipping log event without valid timestamp in {}", log_group);
        return None;
    };

    let message = event.message().unwrap_or_default().trim_end();
    Some(LogLine::new(timestamp, message))
}
