//! Expected-process registry
//!
//! The registry lists every process the dashboard must report on, whether or
//! not it shows up in the fetched logs. It is passed around explicitly so tests
//! can use smaller registries.

use serde::{Deserialize, Serialize};

use crate::domain::process::ProcessName;

/// Flat lambda processes monitored by default
pub const DEFAULT_FLAT_PROCESSES: [&str; 3] = ["fetcher", "refresh", "dump"];

/// Publisher sub-runs monitored by default
pub const DEFAULT_SUB_RUNS: [&str; 9] = [
    "daily|bluesky",
    "daily|threads",
    "daily|twitter",
    "5min|bluesky",
    "5min|threads",
    "5min|twitter",
    "weekly|bluesky",
    "weekly|threads",
    "weekly|twitter",
];

/// The set of processes expected to appear in every status map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRegistry {
    /// Processes whose whole log stream is one status unit
    pub flat: Vec<ProcessName>,

    /// Sub-runs multiplexed inside the publisher's log stream
    pub sub_runs: Vec<ProcessName>,
}

impl ProcessRegistry {
    pub fn new(flat: Vec<ProcessName>, sub_runs: Vec<ProcessName>) -> Self {
        Self { flat, sub_runs }
    }

    /// Every expected name, flat processes first
    pub fn expected_names(&self) -> impl Iterator<Item = &ProcessName> {
        self.flat.iter().chain(self.sub_runs.iter())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.expected_names().any(|expected| expected.as_str() == name)
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self {
            flat: DEFAULT_FLAT_PROCESSES.into_iter().map(ProcessName::from).collect(),
            sub_runs: DEFAULT_SUB_RUNS.into_iter().map(ProcessName::from).collect(),
        }
    }
}
