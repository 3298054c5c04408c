//! Backoff for model HTTP calls.
//!
//! Each failed attempt is classified where it happens. For an error response
//! the HTTP status alone decides; for a transport failure the `reqwest` error
//! kind and its source chain decide. Response bodies are never inspected.

use periodic_core::{PeriodicError, Result};
use reqwest::StatusCode;
use std::{error::Error as StdError, future::Future, time::Duration};

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f32) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    fn delay_after(&self, current: Duration) -> Duration {
        let scaled = current.mul_f64(f64::from(self.backoff_multiplier.max(1.0)));
        scaled.min(self.max_delay)
    }
}

/// A failed request attempt together with whether sending it again may help.
#[derive(Debug)]
pub struct AttemptError {
    pub error: PeriodicError,
    pub retryable: bool,
}

impl AttemptError {
    /// Fails the call without another attempt.
    pub fn permanent(error: PeriodicError) -> Self {
        Self { error, retryable: false }
    }

    /// The provider answered with a non-success `status`.
    pub fn status(provider: &str, status: StatusCode, body: &str) -> Self {
        Self {
            error: PeriodicError::Model(format!("{provider} API error {status}: {body}")),
            retryable: is_retryable_status(status),
        }
    }

    /// No usable response arrived: `context` says which step failed.
    pub fn transport(provider: &str, context: &str, error: &reqwest::Error) -> Self {
        Self {
            error: PeriodicError::Model(format!("{provider} {context}: {error}")),
            retryable: is_retryable_transport(error),
        }
    }
}

/// 408, 429 and the transient 5xx statuses.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

#[must_use]
pub fn is_retryable_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || is_transient_transport_message(&error_chain(error))
}

/// Matches the wording of low-level I/O failures surfaced through `reqwest`.
#[must_use]
pub fn is_transient_transport_message(message: &str) -> bool {
    let normalized = message.to_ascii_lowercase();
    ["timed out", "connection reset", "connection closed", "broken pipe", "unexpected eof"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn error_chain(error: &dyn StdError) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Runs `operation` until it succeeds, fails permanently, or the retries in
/// `retry_config` are used up.
pub async fn execute_with_retry<T, Op, Fut>(retry_config: &RetryConfig, mut operation: Op) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut attempt: u32 = 0;
    let mut delay = retry_config.initial_delay;

    loop {
        let failure = match operation().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if !retry_config.enabled || !failure.retryable || attempt >= retry_config.max_retries {
            return Err(failure.error);
        }

        attempt += 1;
        tracing::warn!(
            attempt,
            max_retries = retry_config.max_retries,
            delay_ms = delay.as_millis(),
            error = %failure.error,
            "model request failed with retryable error, retrying"
        );
        tokio::time::sleep(delay).await;
        delay = retry_config.delay_after(delay);
    }
}
