//! Vigil HTTP Client
//!
//! A small, type-safe HTTP client for the Vigil server API.
//!
//! # Example
//!
//! ```no_run
//! use vigil_client::StatusClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vigil_client::ClientError> {
//!     let client = StatusClient::new("http://localhost:8080");
//!
//!     for (name, status) in client.get_statuses().await? {
//!         println!("{}: {}", name, if status.success { "ok" } else { "failing" });
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod status;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use vigil_core::dto::ErrorResponse;

/// HTTP client for the Vigil server API
#[derive(Debug, Clone)]
pub struct StatusClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl StatusClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("Base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Error responses carry a `{ error, message }` body; when the body has
    /// another shape its raw text becomes the message.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => ClientError::api_error(status.as_u16(), parsed.error, parsed.message),
                Err(_) => ClientError::api_error(status.as_u16(), status.to_string(), body),
            };
            tracing::debug!("Request failed: {}", err);
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StatusClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = StatusClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = StatusClient::with_client("http://localhost:8080", Client::new());
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_url_encodes_process_name() {
        let client = StatusClient::new("http://localhost:8080");

        let url = client.url(&["status", "daily|bluesky"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/status/daily|bluesky");

        let url = client.url(&["status", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/status/a%2Fb");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = StatusClient::new("http://monitor.local/api/");
        let url = client.url(&["processes"]).unwrap();
        assert_eq!(url.as_str(), "http://monitor.local/api/processes");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = StatusClient::new("not a url");
        assert!(matches!(
            client.url(&["status"]),
            Err(ClientError::InvalidRequest(_))
        ));
    }
}
