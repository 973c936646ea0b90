//! Server configuration
//!
//! Defines all configurable parameters of the server: where it listens, which
//! log groups belong to which process, how the log store is paged and how
//! often each process is expected to run.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use vigil_core::domain::ProcessName;
use vigil_core::domain::registry::{DEFAULT_FLAT_PROCESSES, DEFAULT_SUB_RUNS};
use vigil_core::segment::{HeaderMatcher, PUBLISHER_HEADER_PATTERN, PatternHeaderMatcher};
use vigil_core::status::SchedulePolicy;

use crate::service::status_service::{ProcessTarget, ProcessTargets};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// AWS region of the log store; the default chain decides when unset
    pub aws_region: Option<String>,

    /// Prefix prepended to function names to get their log group
    pub log_group_prefix: String,

    /// Flat processes as (process name, function name)
    pub flat_processes: Vec<(ProcessName, String)>,

    /// Function that multiplexes the publisher sub-runs
    pub publisher_function: String,

    /// Sub-runs expected in the publisher's logs
    pub sub_runs: Vec<ProcessName>,

    /// Number of most recent log streams read per log group
    pub stream_limit: i32,

    /// Upper bound on pages read from a single stream
    pub max_pages_per_stream: usize,

    /// Expected run interval of flat processes
    pub schedules: Vec<(ProcessName, Duration)>,

    /// Slack added to every interval before a process counts as late
    pub late_grace: Duration,

    /// Only accept header lines that consist of the sub-run name alone
    pub strict_headers: bool,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            aws_region: None,
            log_group_prefix: "/aws/lambda/".to_string(),
            flat_processes: DEFAULT_FLAT_PROCESSES
                .into_iter()
                .map(|name| (ProcessName::from(name), name.to_string()))
                .collect(),
            publisher_function: "publisher".to_string(),
            sub_runs: DEFAULT_SUB_RUNS.into_iter().map(ProcessName::from).collect(),
            stream_limit: 10,
            max_pages_per_stream: 20,
            schedules: vec![
                (ProcessName::from("fetcher"), Duration::from_secs(300)),
                (ProcessName::from("refresh"), Duration::from_secs(86_400)),
                (ProcessName::from("dump"), Duration::from_secs(86_400)),
            ],
            late_grace: Duration::from_secs(600),
            strict_headers: false,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Every variable is optional and falls back to the default:
    /// - VIGIL_BIND_ADDR (default: 0.0.0.0:8080)
    /// - VIGIL_AWS_REGION
    /// - VIGIL_LOG_GROUP_PREFIX (default: /aws/lambda/)
    /// - VIGIL_FLAT_PROCESSES (`name=function,...`)
    /// - VIGIL_PUBLISHER_FUNCTION (default: publisher)
    /// - VIGIL_SUB_RUNS (`daily|bluesky,...`)
    /// - VIGIL_STREAM_LIMIT (default: 10)
    /// - VIGIL_MAX_PAGES_PER_STREAM (default: 20)
    /// - VIGIL_SCHEDULES (`name=seconds,...`)
    /// - VIGIL_LATE_GRACE (seconds, default: 600)
    /// - VIGIL_STRICT_HEADERS (default: false)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::new();

        let flat_processes = match env("VIGIL_FLAT_PROCESSES") {
            Some(raw) => parse_pairs(&raw)
                .context("Invalid VIGIL_FLAT_PROCESSES")?
                .into_iter()
                .map(|(name, function)| (ProcessName::from(name), function))
                .collect(),
            None => defaults.flat_processes,
        };

        let sub_runs = match env("VIGIL_SUB_RUNS") {
            Some(raw) => parse_list(&raw).into_iter().map(ProcessName::from).collect(),
            None => defaults.sub_runs,
        };

        let schedules = match env("VIGIL_SCHEDULES") {
            Some(raw) => parse_schedules(&raw).context("Invalid VIGIL_SCHEDULES")?,
            None => defaults.schedules,
        };

        let stream_limit = match env("VIGIL_STREAM_LIMIT") {
            Some(raw) => parse_number(&raw).context("Invalid VIGIL_STREAM_LIMIT")?,
            None => defaults.stream_limit,
        };

        let max_pages_per_stream = match env("VIGIL_MAX_PAGES_PER_STREAM") {
            Some(raw) => parse_number(&raw).context("Invalid VIGIL_MAX_PAGES_PER_STREAM")?,
            None => defaults.max_pages_per_stream,
        };

        let late_grace = match env("VIGIL_LATE_GRACE") {
            Some(raw) => {
                Duration::from_secs(parse_number(&raw).context("Invalid VIGIL_LATE_GRACE")?)
            }
            None => defaults.late_grace,
        };

        let strict_headers = match env("VIGIL_STRICT_HEADERS") {
            Some(raw) => parse_bool(&raw).context("Invalid VIGIL_STRICT_HEADERS")?,
            None => defaults.strict_headers,
        };

        Ok(Self {
            bind_addr: env("VIGIL_BIND_ADDR").unwrap_or(defaults.bind_addr),
            aws_region: env("VIGIL_AWS_REGION"),
            log_group_prefix: env("VIGIL_LOG_GROUP_PREFIX").unwrap_or(defaults.log_group_prefix),
            flat_processes,
            publisher_function: env("VIGIL_PUBLISHER_FUNCTION")
                .unwrap_or(defaults.publisher_function),
            sub_runs,
            stream_limit,
            max_pages_per_stream,
            schedules,
            late_grace,
            strict_headers,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            bail!("bind_addr cannot be empty");
        }

        if self.publisher_function.is_empty() {
            bail!("publisher_function cannot be empty");
        }

        if self.stream_limit <= 0 {
            bail!("stream_limit must be greater than 0");
        }

        if self.max_pages_per_stream == 0 {
            bail!("max_pages_per_stream must be greater than 0");
        }

        if let Some((name, _)) = self.schedules.iter().find(|(_, interval)| interval.is_zero()) {
            bail!("schedule interval of {} must be greater than 0", name);
        }

        let mut names: Vec<&ProcessName> = self
            .flat_processes
            .iter()
            .map(|(name, _)| name)
            .chain(self.sub_runs.iter())
            .collect();
        names.sort();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            bail!("process {} is registered twice", pair[0]);
        }

        Ok(())
    }

    /// Log group of a function
    pub fn log_group(&self, function: &str) -> String {
        format!("{}{}", self.log_group_prefix, function)
    }

    /// Log groups of every monitored process
    pub fn targets(&self) -> ProcessTargets {
        ProcessTargets {
            flat: self
                .flat_processes
                .iter()
                .map(|(name, function)| ProcessTarget::new(name.clone(), self.log_group(function)))
                .collect(),
            publisher: ProcessTarget::new(
                self.publisher_function.as_str(),
                self.log_group(&self.publisher_function),
            ),
            sub_runs: self.sub_runs.clone(),
        }
    }

    /// Lateness policy: flat processes from `schedules`, sub-runs from their frequency
    pub fn schedule_policy(&self) -> anyhow::Result<SchedulePolicy> {
        let grace = chrono::Duration::from_std(self.late_grace).context("late_grace too large")?;

        let mut policy = SchedulePolicy::from_frequencies(&self.sub_runs, grace);
        for (name, interval) in &self.schedules {
            let interval = chrono::Duration::from_std(*interval)
                .with_context(|| format!("schedule interval of {} too large", name))?;
            policy = policy.with_interval(name.clone(), interval);
        }

        Ok(policy)
    }

    /// Header matcher used to segment the publisher's logs
    pub fn header_matcher(&self) -> anyhow::Result<Arc<dyn HeaderMatcher>> {
        let matcher = if self.strict_headers {
            PatternHeaderMatcher::whole_message(PUBLISHER_HEADER_PATTERN)
        } else {
            PatternHeaderMatcher::new(PUBLISHER_HEADER_PATTERN)
        }
        .context("Invalid header pattern")?;

        Ok(Arc::new(matcher))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Splits a comma-separated list, ignoring blank entries
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T>(raw: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("expected a number, got `{}`", raw.trim()))
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("expected true or false, got `{}`", other),
    }
}

/// Parses `key=value,key=value`
fn parse_pairs(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    parse_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("expected `name=value`, got `{}`", entry),
        })
        .collect()
}

/// Parses `name=seconds,name=seconds`
fn parse_schedules(raw: &str) -> anyhow::Result<Vec<(ProcessName, Duration)>> {
    parse_pairs(raw)?
        .into_iter()
        .map(|(name, seconds)| {
            let seconds = seconds
                .parse::<u64>()
                .with_context(|| format!("invalid interval for {}: `{}`", name, seconds))?;
            Ok((ProcessName::from(name), Duration::from_secs(seconds)))
        })
        .collect()
}
