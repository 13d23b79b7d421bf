//! Opt-in retry wrapper around a [`Transport`]
//!
//! Nothing in the client retries on its own; callers reach for
//! [`fetch_with_retry`] (or [`crate::client::HttpClient::request_with_retry`])
//! when a call is worth repeating.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DeskError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Retry budget and per-attempt timeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOptions {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Base backoff; attempt `n` waits `retry_delay * 2^n`
    pub retry_delay: Duration,
    /// Upper bound for a single attempt
    pub timeout: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryOptions {
    /// Backoff before the attempt following `attempt` (counted from 0)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Async sleeping abstraction so tests can observe backoff without waiting.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Send `request`, retrying server and transport failures.
pub async fn fetch_with_retry<T: Transport>(
    transport: &T,
    request: HttpRequest,
    options: &RetryOptions,
) -> Result<HttpResponse> {
    fetch_with_retry_using(transport, request, options, &TokioSleeper).await
}

/// [`fetch_with_retry`] with an explicit sleeper.
///
/// 4xx answers are returned as `Client error: <status> <reason>` straight
/// away. 5xx answers, transport errors and timed-out attempts are retried
/// until `options.retries` extra attempts are spent, then the last failure
/// is returned.
pub async fn fetch_with_retry_using<T, S>(
    transport: &T,
    request: HttpRequest,
    options: &RetryOptions,
    sleeper: &S,
) -> Result<HttpResponse>
where
    T: Transport,
    S: Sleeper,
{
    let mut attempt: u32 = 0;

    loop {
        let error = match attempt_once(transport, request.clone(), options.timeout).await {
            Ok(response) if response.status.is_success() => return Ok(response),
            Ok(response) if response.status.is_client_error() => {
                return Err(DeskError::client_status(
                    response.status.as_u16(),
                    response.status.canonical_reason().unwrap_or("Unknown"),
                ));
            }
            Ok(response) => DeskError::server_status(
                response.status.as_u16(),
                response.status.canonical_reason().unwrap_or("Unknown"),
            ),
            Err(error) if error.is_retryable() => error,
            Err(error) => return Err(error),
        };

        if attempt >= options.retries {
            warn!(url = %request.url, attempts = attempt + 1, %error, "giving up");
            return Err(error);
        }

        let delay = options.backoff(attempt);
        debug!(url = %request.url, attempt, delay_ms = delay.as_millis() as u64, %error, "retrying");
        sleeper.sleep(delay).await;
        attempt += 1;
    }
}

async fn attempt_once<T: Transport>(
    transport: &T,
    request: HttpRequest,
    timeout: Duration,
) -> Result<HttpResponse> {
    match tokio::time::timeout(timeout, transport.send(request)).await {
        Ok(result) => result,
        Err(_) => Err(DeskError::timeout(timeout.as_millis() as u64)),
    }
}
