//! Exponential backoff shared by the outbound HTTP clients.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

pub const MAX_ATTEMPTS: u32 = 3;

/// Outcome of one attempt.
pub enum Attempt<T, E> {
    Done(T),
    /// Worth another try (connection error, 429, 5xx).
    Retry(E),
    Fatal(E),
}

pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Runs `call` up to `MAX_ATTEMPTS` times, sleeping 1s then 2s between tries.
/// Returns the last retryable error once attempts run out.
pub async fn with_backoff<T, E, F, Fut>(label: &str, mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fatal(e) => return Err(e),
            Attempt::Retry(e) => {
                attempt += 1;
                if attempt >= MAX_ATTEMPTS {
                    return Err(e);
                }
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "{} attempt {} failed, retrying after {}ms...",
                    label,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
