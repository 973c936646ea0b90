//! Service Module
//!
//! Business logic layer for the server.
//! Services orchestrate between repositories and the core status logic.

pub mod status;

// Re-export for convenience
pub use status as status_service;
