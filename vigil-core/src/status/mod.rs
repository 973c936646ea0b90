//! Status derivation
//!
//! Turns per-process log sequences into the status map served to the
//! dashboard.

pub mod aggregate;
pub mod derive;
pub mod lateness;

pub use aggregate::aggregate;
pub use derive::{derive_status, derive_sub_run_status, is_error_line};
pub use lateness::SchedulePolicy;
