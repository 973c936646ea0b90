//! Run segmentation
//!
//! The publisher lambda runs several named sub-runs (`"daily|bluesky"`, ...)
//! and they all end up in one log stream. This module finds the header lines
//! that open each sub-run and cuts the stream into one window per sub-run.

pub mod header;
pub mod segmenter;

pub use header::{HeaderMatcher, PUBLISHER_HEADER_PATTERN, PatternHeaderMatcher};
pub use segmenter::{HEADER_LOOKBEHIND, RUN_COMPLETION_MARKER, RunSegmenter, RunWindow};
