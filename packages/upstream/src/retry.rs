//! Bounded retry for rate-limited requests.
//!
//! Only HTTP 429 is retried, up to [`MAX_ATTEMPTS`] attempts in total, with
//! a linear backoff of one [`BACKOFF_STEP`] per attempt made (1s, then 2s).
//! Any other non-success status fails immediately with that status.
//! Transport errors are not retried.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::UpstreamError;

/// Total attempts, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff unit; attempt `n` waits `n * BACKOFF_STEP` before the next one.
pub const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// What to do with a response received on a given attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Success: read the body.
    Accept,
    /// Rate limited: wait and try again.
    RetryAfter(Duration),
    /// Give up with this status.
    Fail(StatusCode),
}

/// Decides how to handle `status` received on `attempt` (1-based).
#[must_use]
pub fn decide(status: StatusCode, attempt: u32) -> RetryDecision {
    if status.is_success() {
        RetryDecision::Accept
    } else if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_ATTEMPTS {
        RetryDecision::RetryAfter(BACKOFF_STEP * attempt)
    } else {
        RetryDecision::Fail(status)
    }
}

fn status_error(status: StatusCode) -> UpstreamError {
    UpstreamError::Status {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Sends the request built by `build_request` and parses the body as JSON.
///
/// The closure is called once per attempt since builders are consumed by
/// `send()`.
///
/// # Errors
///
/// Returns [`UpstreamError::Status`] for a non-success status (after
/// retries for 429), [`UpstreamError::Http`] if the request could not be
/// sent or the body could not be read, and [`UpstreamError::Json`] if the
/// body is not valid JSON.
pub async fn send_json<F>(build_request: F) -> Result<Value, UpstreamError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 1;
    loop {
        let response = build_request().send().await?;
        let status = response.status();

        match decide(status, attempt) {
            RetryDecision::Accept => {
                let text = response.text().await?;
                return Ok(serde_json::from_str(&text)?);
            }
            RetryDecision::RetryAfter(delay) => {
                log::warn!(
                    "HTTP 429 from {} (attempt {attempt}/{MAX_ATTEMPTS}), retrying in {delay:?}",
                    response.url()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            RetryDecision::Fail(status) => {
                log::debug!("HTTP {status} from {}", response.url());
                return Err(status_error(status));
            }
        }
    }
}
