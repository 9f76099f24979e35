//! # Venue Errors
//!
//! Fetch-layer failures: everything that can go wrong between asking a venue
//! for state and handing a snapshot to a depth builder.
//!
//! Connection-level failures are transient and retried by the fetch path;
//! protocol and request errors are permanent — retrying a response the venue
//! has already malformed only burns the attempt budget.

use crate::application::services::retry::Retryable;
use thiserror::Error;

/// Errors from the venue fetch layer.
#[derive(Debug, Clone, Error)]
pub enum VenueError {
    /// Failed to reach the venue (HTTP transport, RPC transport, timeout).
    #[error("connection error: {0}")]
    Connection(String),

    /// The venue answered with something the adapter cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The request itself was malformed (bad address, unknown token).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl VenueError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates an invalid-request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Unwraps the final error out of a finished retry loop.
    #[must_use]
    pub fn from_retry(error: crate::application::services::retry::RetryError<Self>) -> Self {
        error.into_inner()
    }
}

impl Retryable for VenueError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for venue operations.
pub type VenueResult<T> = Result<T, VenueError>;
