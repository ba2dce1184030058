use crate::DbError;

use idm_config::RetryPolicy;

use std::fmt::Display;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::sleep;

/// Run `operation` until it succeeds, fails with an error that is not
/// retryable, or has been attempted `policy.max_attempts` times.
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + IsRetryable,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} recovered on attempt {}", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < policy.max_attempts && e.is_retryable() => {
                let wait = jittered(policy, policy.backoff(attempt));
                debug!(
                    "{} attempt {} failed: {}. Next attempt in {:?}",
                    operation_name, attempt, e, wait
                );
                sleep(wait).await;
                attempt += 1;
            }
            Err(e) => {
                if attempt > 1 {
                    warn!("{} gave up after {} attempts: {}", operation_name, attempt, e);
                }
                return Err(e);
            }
        }
    }
}

fn jittered(policy: &RetryPolicy, wait: Duration) -> Duration {
    if policy.jitter {
        wait.mul_f64(0.5 + rand::random::<f64>())
    } else {
        wait
    }
}

/// Errors that can tell whether another attempt might succeed.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for DbError {
    fn is_retryable(&self) -> bool {
        DbError::is_retryable(self)
    }
}
