//! Status aggregator
//!
//! Combines the flat processes and the segmented publisher sub-runs into one
//! map that covers the whole registry.

use crate::domain::log::LogLine;
use crate::domain::process::{ProcessName, ProcessStatusMap};
use crate::domain::registry::ProcessRegistry;
use crate::segment::RunSegmenter;
use crate::status::derive::{derive_status, derive_sub_run_status};

/// Builds the status map from already fetched log sequences
///
/// `flat` holds each flat process with its ascending log sequence and
/// `multiplexed` is the publisher's ascending sequence. The result contains
/// every name of `registry` plus any unknown sub-run found in the publisher
/// logs.
pub fn aggregate(
    registry: &ProcessRegistry,
    segmenter: &RunSegmenter,
    flat: Vec<(ProcessName, Vec<LogLine>)>,
    multiplexed: Vec<LogLine>,
) -> ProcessStatusMap {
    let mut statuses = ProcessStatusMap::new();

    for (name, lines) in flat {
        statuses.insert(name, derive_status(lines));
    }

    for (name, runs) in segmenter.segment_runs(&multiplexed, &registry.sub_runs) {
        statuses.insert(name, derive_sub_run_status(runs));
    }

    for name in registry.expected_names() {
        if !statuses.contains_key(name) {
            statuses.insert(name.clone(), derive_status(Vec::new()));
        }
    }

    statuses
}
