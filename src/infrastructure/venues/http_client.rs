//! # HTTP Client
//!
//! Shared `reqwest` wrapper for the order-book fetch paths.
//!
//! Every exchange adapter speaks plain JSON over GET; this wrapper owns the
//! connection pool, the request timeout, and the shared User-Agent header so
//! individual adapters only describe URLs and field mappings.

use crate::infrastructure::venues::error::{VenueError, VenueResult};
use std::time::Duration;

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// User-Agent sent with every order-book request.
const USER_AGENT: &str = concat!("depth-engine/", env!("CARGO_PKG_VERSION"));

/// HTTP client for venue REST APIs.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The underlying reqwest client.
    client: reqwest::Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` if the underlying client cannot be
    /// built.
    pub fn new() -> VenueResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` if the underlying client cannot be
    /// built.
    pub fn with_timeout(timeout_ms: u64) -> VenueResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VenueError::connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Performs a GET request and decodes the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` on transport failures and non-success
    /// status codes, `VenueError::Protocol` if the body is not valid JSON.
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> VenueResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| VenueError::connection(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VenueError::connection(format!(
                "GET {url} returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VenueError::protocol_error(format!("invalid JSON from {url}: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_applied() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn custom_timeout_is_applied() {
        let client = HttpClient::with_timeout(2_500).unwrap();
        assert_eq!(client.timeout_ms(), 2_500);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connection_error() {
        let client = HttpClient::with_timeout(200).unwrap();
        let result = client
            .get_json("http://127.0.0.1:1/orderbook", &[])
            .await;
        assert!(matches!(result, Err(VenueError::Connection(_))));
    }
}
