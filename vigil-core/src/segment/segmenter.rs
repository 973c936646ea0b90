//! Run segmenter
//!
//! Cuts the publisher's ordered log stream into one window per sub-run.
//!
//! Every sub-run invocation looks like this in the stream:
//!
//! ```text
//! START RequestId: ...      <- platform marker, always right before the header
//! daily|bluesky             <- header line
//! ...                       <- sub-run output
//! REPORT RequestId: ...     <- platform marker, written once the invocation ends
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::log::LogLine;
use crate::domain::process::ProcessName;
use crate::segment::header::{HeaderMatcher, PatternHeaderMatcher};

/// Number of lines before a header that belong to its window (the `START` marker)
pub const HEADER_LOOKBEHIND: usize = 1;

/// Prefix of the line the platform writes when an invocation completes
pub const RUN_COMPLETION_MARKER: &str = "REPORT";

/// Half-open slice `[from, to)` of a log sequence attributed to one sub-run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWindow {
    pub name: ProcessName,
    pub from: usize,
    pub to: usize,
}

impl RunWindow {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Splits a multiplexed log stream into named sub-run sequences
#[derive(Clone)]
pub struct RunSegmenter {
    matcher: Arc<dyn HeaderMatcher>,
}

impl RunSegmenter {
    pub fn new(matcher: Arc<dyn HeaderMatcher>) -> Self {
        Self { matcher }
    }

    /// Positions and names of every header line, in ascending order
    pub fn header_indices(&self, lines: &[LogLine]) -> Vec<(usize, ProcessName)> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                self.matcher
                    .sub_run_name(&line.message)
                    .map(|name| (index, name))
            })
            .collect()
    }

    /// Computes the sub-run windows of `lines`
    ///
    /// When the output after the last header has no completion marker the
    /// invocation is still running (or was cut off by the fetch window). That
    /// last sub-run and everything after it are left out so an in-flight run is
    /// never reported as finished.
    pub fn windows(&self, lines: &[LogLine]) -> Vec<RunWindow> {
        let mut headers = self.header_indices(lines);

        let Some(&(last_header, _)) = headers.last() else {
            return Vec::new();
        };

        let mut end = lines.len();
        let completed = lines[last_header..]
            .iter()
            .any(|line| line.message.starts_with(RUN_COMPLETION_MARKER));

        if !completed {
            if let Some((_, name)) = headers.pop() {
                tracing::debug!(
                    "Dropping unterminated sub-run {} starting at line {}",
                    name,
                    last_header
                );
            }
            end = last_header.saturating_sub(HEADER_LOOKBEHIND);
        }

        let starts: Vec<usize> = headers
            .iter()
            .map(|(index, _)| index.saturating_sub(HEADER_LOOKBEHIND))
            .collect();

        headers
            .into_iter()
            .enumerate()
            .map(|(i, (_, name))| {
                let from = starts[i];
                let to = starts.get(i + 1).copied().unwrap_or(end).max(from);
                RunWindow { name, from, to }
            })
            .collect()
    }

    /// Groups `lines` by sub-run
    ///
    /// Windows of a sub-run that ran several times are concatenated in
    /// chronological order. Every name in `expected` is present in the result,
    /// with an empty sequence when it never ran. Names outside `expected` are
    /// kept under their literal name.
    pub fn segment(
        &self,
        lines: &[LogLine],
        expected: &[ProcessName],
    ) -> BTreeMap<ProcessName, Vec<LogLine>> {
        self.segment_runs(lines, expected)
            .into_iter()
            .map(|(name, runs)| (name, runs.concat()))
            .collect()
    }

    /// Like [`segment`](Self::segment) but keeps each window as its own run
    pub fn segment_runs(
        &self,
        lines: &[LogLine],
        expected: &[ProcessName],
    ) -> BTreeMap<ProcessName, Vec<Vec<LogLine>>> {
        let mut runs: BTreeMap<ProcessName, Vec<Vec<LogLine>>> = BTreeMap::new();

        for window in self.windows(lines) {
            if !expected.contains(&window.name) {
                tracing::warn!(
                    "Found header for unknown sub-run {}, reporting it as-is",
                    window.name
                );
            }

            runs.entry(window.name)
                .or_default()
                .push(lines[window.from..window.to].to_vec());
        }

        for name in expected {
            runs.entry(name.clone()).or_default();
        }

        runs
    }
}

impl Default for RunSegmenter {
    fn default() -> Self {
        Self::new(Arc::new(PatternHeaderMatcher::default()))
    }
}

impl std::fmt::Debug for RunSegmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSegmenter").finish_non_exhaustive()
    }
}
