//! Status endpoints

use vigil_core::domain::{ProcessStatus, ProcessStatusMap};
use vigil_core::dto::ProcessList;

use crate::StatusClient;
use crate::error::Result;

impl StatusClient {
    /// Status of every monitored process
    ///
    /// Fails as a whole when the server could not read the log store.
    pub async fn get_statuses(&self) -> Result<ProcessStatusMap> {
        let url = self.url(&["status"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Status of a single process
    ///
    /// # Arguments
    /// * `name` - Process name, e.g. `"fetcher"` or `"daily|bluesky"`
    pub async fn get_status(&self, name: &str) -> Result<ProcessStatus> {
        let url = self.url(&["status", name])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// The monitored processes
    pub async fn list_processes(&self) -> Result<ProcessList> {
        let url = self.url(&["processes"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
