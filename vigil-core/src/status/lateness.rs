//! Schedule-based lateness
//!
//! Log lines only say when a process last ran cleanly. Whether that is recent
//! enough depends on how often the process is scheduled, which is
//! configuration. A process that keeps failing is late once its last
//! successful run falls behind the schedule.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::process::{ProcessName, ProcessStatusMap};

/// Expected run interval for a composite-name frequency prefix
pub fn frequency_interval(frequency: &str) -> Option<Duration> {
    match frequency {
        "5min" => Some(Duration::minutes(5)),
        "daily" => Some(Duration::days(1)),
        "weekly" => Some(Duration::weeks(1)),
        _ => None,
    }
}

/// Expected run intervals per process
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    intervals: HashMap<ProcessName, Duration>,
    grace: Duration,
}

impl SchedulePolicy {
    /// Creates an empty policy; processes without an interval are never late
    pub fn new(grace: Duration) -> Self {
        Self {
            intervals: HashMap::new(),
            grace,
        }
    }

    /// Infers intervals from the frequency part of composite names
    pub fn from_frequencies<'a>(
        names: impl IntoIterator<Item = &'a ProcessName>,
        grace: Duration,
    ) -> Self {
        let intervals = names
            .into_iter()
            .filter_map(|name| {
                let interval = name.frequency().and_then(frequency_interval)?;
                Some((name.clone(), interval))
            })
            .collect();

        Self { intervals, grace }
    }

    pub fn with_interval(mut self, name: impl Into<ProcessName>, interval: Duration) -> Self {
        self.intervals.insert(name.into(), interval);
        self
    }

    pub fn interval(&self, name: &str) -> Option<Duration> {
        self.intervals.get(name).copied()
    }

    /// Whether a process that last succeeded at `last_success` is overdue at `now`
    pub fn is_late(
        &self,
        name: &str,
        last_success: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(interval) = self.interval(name) else {
            return false;
        };

        match last_success {
            Some(last_success) => now - last_success > interval + self.grace,
            None => true,
        }
    }

    /// Returns a new map with every status' lateness flag set
    pub fn apply(&self, statuses: ProcessStatusMap, now: DateTime<Utc>) -> ProcessStatusMap {
        statuses
            .into_iter()
            .map(|(name, status)| {
                let is_late = self.is_late(name.as_str(), status.last_success, now);
                (name, status.with_lateness(is_late))
            })
            .collect()
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self::new(Duration::zero())
    }
}
