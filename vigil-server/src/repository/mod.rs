//! Repository layer
//!
//! Read access to the remote log store. The store is reached through two
//! traits: `LogSource` is what the service layer consumes, `LogPageBackend`
//! is the minimal paging surface of the store itself, kept small so it can be
//! swapped for a fake in tests.

pub mod cloudwatch;
pub mod log;

pub use log::{FetchError, LogPage, LogPageBackend, LogSource, PagedLogSource};
