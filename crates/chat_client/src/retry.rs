//! Fixed-delay retry for the transcription call.
//!
//! Deliberately simple: a constant delay, no jitter, no backoff growth.
//! The streaming chat exchange is never wrapped in this because partial
//! output may already have reached the user.

use std::future::Future;
use std::time::Duration;

use log::warn;

/// Run `operation`, retrying up to `max_retries` times on failure with a
/// fixed `delay` between attempts.
///
/// Total attempts are `max_retries + 1`. No delay follows the final
/// attempt, and the last failure is propagated unmodified.
pub async fn with_retry<T, E, F, Fut>(mut operation: F, max_retries: u32, delay: Duration) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_retries => {
                attempt += 1;
                warn!("Attempt {attempt} failed, retrying in {delay:?}: {error}");
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
