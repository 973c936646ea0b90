//! Process domain model
//!
//! A process is anything the dashboard reports a status for: either a flat
//! lambda whose whole log stream is one unit, or a sub-run multiplexed inside
//! the publisher's stream (named `"<frequency>|<channel>"`).

use std::borrow::Borrow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::log::LogLine;

/// Opaque identifier of a monitored process
///
/// Composite sub-run names such as `"daily|bluesky"` are a naming convention
/// only; equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessName(String);

impl ProcessName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The frequency part of a composite name (`"daily"` for `"daily|bluesky"`)
    pub fn frequency(&self) -> Option<&str> {
        self.0.split_once('|').map(|(frequency, _)| frequency)
    }
}

impl std::fmt::Display for ProcessName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProcessName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ProcessName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for ProcessName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Status of one process as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatus {
    /// At least one line was observed and none of them mentions an error
    pub success: bool,

    /// The last successful run is older than the process schedule allows
    pub is_late: bool,

    /// Timestamp of the most recent line, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,

    /// End of the most recent run without an error line, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,

    /// Log lines, most recent first
    pub logs: Vec<LogLine>,
}

impl ProcessStatus {
    /// Returns a copy of this status with the lateness flag set
    pub fn with_lateness(self, is_late: bool) -> Self {
        Self { is_late, ..self }
    }

    /// True when the process was never observed running
    pub fn has_no_logs(&self) -> bool {
        self.logs.is_empty()
    }
}

/// Status of every monitored process, keyed by name
pub type ProcessStatusMap = BTreeMap<ProcessName, ProcessStatus>;
