//! Retry policy for sync gateway requests.
//!
//! - Max retries: 2 by default (3 total attempts)
//! - Initial delay 250ms, doubling, capped at 4s
//! - Down-jitter up to 25% (multiplier in [0.75, 1.0])
//! - Retryable: connection errors, HTTP 408, 409, 429 and 5xx
//! - `Retry-After` (seconds, below 60) overrides the computed delay
//!
//! Every attempt of one logical request carries the same `Idempotency-Key`
//! and an `X-Nebula-Attempt` counter starting at 0.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};
use uuid::Uuid;

pub const ATTEMPT_HEADER: &str = "X-Nebula-Attempt";
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// 0.25 means up to 25% shorter than the computed delay.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    let delay = Duration::from_secs(secs);
    (delay > Duration::ZERO && delay < Duration::from_secs(60)).then_some(delay)
}

#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 409 | 429) || status.is_server_error()
}

/// Backoff before retry number `step + 1`.
#[must_use]
pub fn retry_delay(step: u32, config: &RetryConfig, headers: Option<&HeaderMap>) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(step as i32);
    let capped = base.min(config.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

#[must_use]
pub fn generate_idempotency_key() -> String {
    format!("nebula-sync-{}", Uuid::new_v4())
}

/// Final result of a retried request.
#[derive(Debug)]
pub enum RetryOutcome {
    /// 2xx response.
    Success(Response),
    /// Non-2xx response, either non-retryable or the last attempt.
    HttpError(Response),
    /// Transport failure on the last attempt, or a non-retryable one.
    Transport { attempts: u32, source: reqwest::Error },
}

impl RetryOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Send the request built by `build_request`, retrying per `config`.
///
/// The closure is called once per attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let idempotency_key = generate_idempotency_key();
    let mut attempt = 0;

    loop {
        let last_attempt = attempt >= config.max_retries;
        let request = build_request()
            .header(ATTEMPT_HEADER, attempt.to_string())
            .header(IDEMPOTENCY_HEADER, &idempotency_key);

        let delay = match request.send().await {
            Ok(response) if response.status().is_success() => {
                return RetryOutcome::Success(response);
            }
            Ok(response) => {
                let status = response.status();
                if last_attempt || !is_retryable_status(status) {
                    return RetryOutcome::HttpError(response);
                }
                let delay = retry_delay(attempt, config, Some(response.headers()));
                tracing::debug!(
                    %status,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying sync request after error status"
                );
                delay
            }
            Err(source) => {
                if last_attempt || !is_retryable_error(&source) {
                    return RetryOutcome::Transport {
                        attempts: attempt + 1,
                        source,
                    };
                }
                let delay = retry_delay(attempt, config, None);
                tracing::debug!(
                    error = %source,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying sync request after connection error"
                );
                delay
            }
        };

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
