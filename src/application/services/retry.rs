//! # Retry Policy
//!
//! Bounded retry with exponential backoff for venue fetches.
//!
//! Retries live here and only here: the depth builders are total functions
//! over whatever snapshot they are handed, so a fetch either survives this
//! policy or produces no snapshot at all (and the market/pool is omitted
//! from the venue's result).
//!
//! # Example
//!
//! ```
//! use depth_engine::application::services::retry::{execute_with_retry, RetryPolicy, Retryable};
//!
//! #[derive(Debug)]
//! struct FetchError(bool);
//!
//! impl Retryable for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         self.0
//!     }
//! }
//!
//! # async fn example() {
//! let policy = RetryPolicy::no_retry();
//! let book = execute_with_retry(&policy, || async {
//!     Err::<&str, _>(FetchError(true))
//! })
//! .await;
//! assert!(book.is_err());
//! # }
//! ```

use rand::Rng;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Classifies errors as transient (worth retrying) or permanent.
pub trait Retryable {
    /// Returns true if the operation should be retried after this error.
    fn is_retryable(&self) -> bool;
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper cap on any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each attempt.
    pub backoff_multiplier: f64,
    /// Jitter factor in `0.0..=1.0`, randomly shortening each delay.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // Mirrors the bounded three-attempt policy the order-book fetchers
        // have always run with.
        Self {
            max_retries: 2,
            initial_delay_ms: 1_000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given bounds; the jitter factor is clamped
    /// to `0.0..=1.0`.
    #[must_use]
    pub fn new(
        max_retries: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            max_delay_ms,
            backoff_multiplier,
            jitter_factor: jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// Creates a policy that never retries (fail fast).
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed), without jitter:
    /// `min(initial_delay * multiplier^attempt, max_delay)`.
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(base.min(self.max_delay_ms as f64) as u64)
    }

    /// Delay before retry number `attempt` with jitter applied
    /// (`delay * (1 - jitter_factor * random())`).
    #[must_use]
    pub fn calculate_delay_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.calculate_delay(attempt);
        if self.jitter_factor <= 0.0 {
            return base;
        }

        let mut rng = rand::rng();
        let jitter: f64 = rng.random();
        let shortened = base.as_millis() as f64 * (1.0 - self.jitter_factor * jitter);
        Duration::from_millis(shortened.max(1.0) as u64)
    }

    /// Returns true if another retry is allowed after `attempts_made`
    /// attempts.
    #[must_use]
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made <= self.max_retries
    }
}

/// Error returned when retry execution gives up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All attempts were exhausted; holds the last error seen.
    Exhausted {
        /// The error from the final attempt.
        last_error: E,
        /// Total attempts made (initial attempt included).
        attempts: u32,
    },
    /// A non-retryable error ended the loop early.
    Permanent {
        /// The permanent error.
        error: E,
        /// Attempts made before hitting it.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Consumes the wrapper and returns the underlying error.
    #[must_use]
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last_error, .. } => last_error,
            Self::Permanent { error, .. } => error,
        }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Permanent { attempts, .. } => *attempts,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                last_error,
                attempts,
            } => write!(f, "gave up after {attempts} attempts: {last_error}"),
            Self::Permanent { error, attempts } => {
                write!(f, "permanent error after {attempts} attempts: {error}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Runs `operation`, retrying transient failures per `policy`.
///
/// # Errors
///
/// Returns [`RetryError::Exhausted`] once the attempt budget is spent and
/// [`RetryError::Permanent`] as soon as a non-retryable error occurs.
pub async fn execute_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);

        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() => {
                return Err(RetryError::Permanent { error, attempts });
            }
            Err(error) => {
                if !policy.should_retry(attempts) {
                    return Err(RetryError::Exhausted {
                        last_error: error,
                        attempts,
                    });
                }
                sleep(policy.calculate_delay_with_jitter(attempts - 1)).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test error")
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, 1, 10, 2.0, 0.0)
    }

    #[test]
    fn delay_doubles_and_caps() {
        let policy = RetryPolicy::new(5, 100, 300, 2.0, 0.0);
        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(300));
        assert_eq!(policy.calculate_delay(5), Duration::from_millis(300));
    }

    #[test]
    fn jitter_never_lengthens_the_delay() {
        let policy = RetryPolicy::new(3, 1_000, 10_000, 2.0, 0.5);
        for _ in 0..10 {
            let jittered = policy.calculate_delay_with_jitter(0);
            assert!(jittered <= Duration::from_millis(1_000));
            assert!(jittered >= Duration::from_millis(500));
        }
    }

    #[test]
    fn jitter_factor_is_clamped() {
        assert!((RetryPolicy::new(1, 1, 1, 1.0, 2.0).jitter_factor - 1.0).abs() < f64::EPSILON);
        assert!(RetryPolicy::new(1, 1, 1, 1.0, -1.0).jitter_factor.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn succeeds_without_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<u32, RetryError<TestError>> =
            execute_with_retry(&fast_policy(3), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&fast_policy(3), || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(TestError { retryable: true })
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_the_attempt_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), RetryError<TestError>> =
            execute_with_retry(&fast_policy(2), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError { retryable: true }) }
            })
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, RetryError::Exhausted { .. }));
        // Initial attempt plus two retries.
        assert_eq!(error.attempts(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_immediately_on_permanent_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), RetryError<TestError>> =
            execute_with_retry(&fast_policy(5), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError { retryable: false }) }
            })
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, RetryError::Permanent { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_retry_policy_attempts_once() {
        let result: Result<(), RetryError<TestError>> =
            execute_with_retry(&RetryPolicy::no_retry(), || async {
                Err(TestError { retryable: true })
            })
            .await;

        assert_eq!(result.unwrap_err().attempts(), 1);
    }

    #[test]
    fn display_mentions_the_attempt_count() {
        let error: RetryError<TestError> = RetryError::Exhausted {
            last_error: TestError { retryable: true },
            attempts: 3,
        };
        assert!(error.to_string().contains("3 attempts"));
    }
}
