//! Core domain types
//!
//! This module contains the structures shared by every Vigil crate.
//! They describe what was read from the log store (`LogLine`), which processes
//! are expected to run (`ProcessRegistry`) and what the dashboard is told about
//! them (`ProcessStatus`).

pub mod log;
pub mod process;
pub mod registry;

pub use log::LogLine;
pub use process::{ProcessName, ProcessStatus, ProcessStatusMap};
pub use registry::ProcessRegistry;
