//! Retry wrapper for the generative API call, with exponential backoff.
//!
//! Retried:
//! - 429 Too Many Requests, while attempts remain
//! - Connection failures and timeouts, while attempts remain
//!
//! Not retried:
//! - Any other non-2xx status
//! - Other transport errors (request building, body encoding, ...)

use std::future::Future;
use std::time::Duration;

use fastweather_core::config::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS};
use fastweather_core::RetrySettings;
use reqwest::{Response, StatusCode};

use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first. Never zero.
    pub max_attempts: u32,
    /// Wait before the first retry (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum wait between attempts
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Wait after the failed attempt with index `attempt` (0-based):
    /// `base_delay * 2^attempt`, capped at `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_attempts,
            settings.base_delay_ms,
            settings.max_delay_ms,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// What to do with a response of the given status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Success,
    RateLimited,
    Fatal,
}

pub fn classify_status(status: StatusCode) -> StatusOutcome {
    if status.is_success() {
        StatusOutcome::Success
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        StatusOutcome::RateLimited
    } else {
        StatusOutcome::Fatal
    }
}

/// Check if a transport error is worth another attempt
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() {
        tracing::debug!("Request timed out, will retry");
        return RetryDecision::Retry;
    }

    if error.is_connect() {
        tracing::debug!("Connection error, will retry");
        return RetryDecision::Retry;
    }

    RetryDecision::NoRetry
}

/// Run `operation` until it yields a 2xx response or a terminal failure.
///
/// # Errors
/// - `HttpStatus` for any non-2xx, non-429 status (no retry)
/// - `RateLimitExhausted` when the last attempt is still a 429
/// - `Transport` for a non-retryable transport error, or any transport error
///   on the last attempt
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, QueryError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let is_last = attempt + 1 >= max_attempts;

        match operation().await {
            Ok(response) => {
                let status = response.status();
                match classify_status(status) {
                    StatusOutcome::Success => {
                        if attempt > 0 {
                            tracing::info!("Request succeeded after {} retries", attempt);
                        }
                        return Ok(response);
                    }
                    StatusOutcome::RateLimited if !is_last => {
                        tracing::warn!(
                            "Rate limited (429) on attempt {} of {}",
                            attempt + 1,
                            max_attempts
                        );
                    }
                    StatusOutcome::RateLimited => {
                        tracing::error!("All {} attempts were rate limited", max_attempts);
                        return Err(QueryError::RateLimitExhausted {
                            attempts: max_attempts,
                        });
                    }
                    StatusOutcome::Fatal => {
                        tracing::debug!("Non-retryable status {}", status);
                        return Err(QueryError::HttpStatus {
                            status: status.as_u16(),
                        });
                    }
                }
            }
            Err(e) => {
                if is_last || is_retryable_error(&e) == RetryDecision::NoRetry {
                    tracing::debug!("Giving up on transport error: {}", e);
                    return Err(QueryError::Transport(e));
                }
                tracing::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    max_attempts,
                    e
                );
            }
        }

        let delay = config.delay_for_attempt(attempt);
        tracing::info!(
            "Retry attempt {} of {}, waiting {:?}",
            attempt + 2,
            max_attempts,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
