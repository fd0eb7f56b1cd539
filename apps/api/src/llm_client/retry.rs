//! Rate-limit backoff around a single model call.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Guarded attempts before the final, unguarded call.
pub const MAX_ATTEMPTS: u32 = 3;

const RATE_LIMIT_MARKERS: &[&str] = &["429", "resource exhausted", "rate"];

/// True when the stringified failure looks like a provider rate limit.
pub fn is_rate_limited(err: &impl Display) -> bool {
    let text = err.to_string().to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|m| text.contains(m))
}

/// Runs `call`, sleeping 1s, 2s, 4s between attempts that fail with a rate-limit
/// signal. Any other failure is returned at once. Once the guarded attempts are
/// used up, one last call is made and its outcome returned unchanged.
pub async fn invoke_with_retry<T, E, F, Fut>(mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    for attempt in 0..MAX_ATTEMPTS {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if is_rate_limited(&e) => {
                let wait = Duration::from_secs(1 << attempt);
                warn!(
                    "Rate limited (attempt {}/{}), waiting {}s: {e}",
                    attempt + 1,
                    MAX_ATTEMPTS,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
    call().await
}
