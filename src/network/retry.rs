use tokio_util::sync::CancellationToken;

use crate::config::defaults;

/// Failure modes specific to the retry wrapper. Network errors are
/// propagated immediately and are not retried here.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
}

/// Wraps a single logical HTTP request so that 429 responses are retried
/// with exponential backoff when `respect_429` is enabled.
/// `build` constructs a fresh request for each attempt since a sent
/// `RequestBuilder` cannot be reused.
pub async fn execute_with_retry<F>(
    build: F,
    ctx: &CancellationToken,
    respect_429: bool,
) -> Result<reqwest::Response, RetryError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut backoff = defaults::RETRY_INITIAL_BACKOFF;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let response = tokio::select! {
            res = build().send() => res?,
            _ = ctx.cancelled() => return Err(RetryError::Cancelled),
        };

        let is_last_attempt = attempt >= defaults::RETRY_MAX_ATTEMPTS;
        if !respect_429 || response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS || is_last_attempt {
            return Ok(response);
        }

        // Drain and close the body before retrying.
        let _ = response.bytes().await;

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = ctx.cancelled() => return Err(RetryError::Cancelled),
        }

        backoff = (backoff * defaults::RETRY_BACKOFF_EXPONENT).min(defaults::RETRY_BACKOFF_CAP);
    }
}
