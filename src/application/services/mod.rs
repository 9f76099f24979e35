//! # Application Services
//!
//! - [`retry`]: bounded retry with exponential backoff around venue fetches

pub mod retry;

pub use retry::{execute_with_retry, RetryError, RetryPolicy, Retryable};
