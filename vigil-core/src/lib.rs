//! Vigil Core
//!
//! Core types and log analysis for the Vigil process monitor.
//!
//! This crate contains:
//! - Domain types: log lines, process names, statuses and the expected-process registry
//! - Segmentation: splitting a multiplexed log stream into named sub-runs
//! - Status: deriving per-process status and lateness from log lines
//! - DTOs: payloads shared by the server and its clients

pub mod domain;
pub mod dto;
pub mod segment;
pub mod status;
