//! Data Transfer Objects for the HTTP API
//!
//! Payloads exchanged between the server and its clients that are not domain
//! types themselves.

use serde::{Deserialize, Serialize};

use crate::domain::process::ProcessName;
use crate::domain::registry::ProcessRegistry;

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind, e.g. `FetchFailure`
    pub error: String,
    pub message: String,
}

/// The monitored processes, as exposed by `GET /processes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessList {
    pub flat: Vec<ProcessName>,
    pub sub_runs: Vec<ProcessName>,
}

impl From<&ProcessRegistry> for ProcessList {
    fn from(registry: &ProcessRegistry) -> Self {
        Self {
            flat: registry.flat.clone(),
            sub_runs: registry.sub_runs.clone(),
        }
    }
}
