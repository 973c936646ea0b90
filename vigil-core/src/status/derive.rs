//! Status deriver

use chrono::{DateTime, Utc};

use crate::domain::log::LogLine;
use crate::domain::process::ProcessStatus;

const ERROR_MARKER: &str = "error";

/// True when the message mentions an error, in any letter case
///
/// This is a plain substring test: `"Error-free run"` counts as an error.
pub fn is_error_line(message: &str) -> bool {
    message.to_lowercase().contains(ERROR_MARKER)
}

/// Derives the status of one process from its log lines in ascending order
///
/// An empty sequence is not a success: the process was never seen running.
/// The returned logs are most recent first and `is_late` is left unset.
/// The whole sequence counts as one run for `last_success`.
pub fn derive_status(mut lines: Vec<LogLine>) -> ProcessStatus {
    let success = is_clean_run(&lines);
    let last_run = lines.last().map(|line| line.timestamp);

    lines.reverse();

    ProcessStatus {
        success,
        is_late: false,
        last_run,
        last_success: if success { last_run } else { None },
        logs: lines,
    }
}

/// Derives the status of a sub-run from its windows in ascending order
///
/// The windows are merged for `success` and `logs`. `last_success` is the end
/// of the latest window without an error line.
pub fn derive_sub_run_status(runs: Vec<Vec<LogLine>>) -> ProcessStatus {
    let last_success = last_successful_run(&runs);

    ProcessStatus {
        last_success,
        ..derive_status(runs.concat())
    }
}

/// End of the latest run that has lines and no error line
pub fn last_successful_run(runs: &[Vec<LogLine>]) -> Option<DateTime<Utc>> {
    runs.iter()
        .filter(|run| is_clean_run(run))
        .filter_map(|run| run.last().map(|line| line.timestamp))
        .max()
}

fn is_clean_run(lines: &[LogLine]) -> bool {
    !lines.is_empty() && !lines.iter().any(|line| is_error_line(&line.message))
}
