//! Retry helper with exponential backoff.
//!
//! All backend calls route through here. Idempotent reads get a fixed
//! attempt ceiling with `2^attempt` seconds between attempts; writes get
//! exactly one attempt, since retrying a token submission could double-count
//! a check-in server-side.

use std::future::Future;
use std::time::Duration;

use crate::error::AttendanceError;

/// Attempt ceiling for idempotent reads.
const READ_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Policy for idempotent (read) calls: up to 3 attempts with backoff.
    pub fn read() -> Self {
        RetryPolicy {
            max_attempts: READ_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Policy for non-idempotent (write/submit) calls: exactly one attempt.
    pub fn write() -> Self {
        RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Custom policy. `base_delay` of zero disables sleeping, which keeps
    /// retry tests fast.
    pub fn custom(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the retry following `attempt` (zero-based): `2^attempt`
    /// times the base delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `op` under this policy. The final failure is propagated only
    /// after all attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AttendanceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttendanceError>>,
    {
        let mut last_err = None;
        for attempt in 0..self.max_attempts {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        log::debug!("[RETRY] call recovered on attempt {}", attempt + 1);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let out_of_attempts = attempt + 1 >= self.max_attempts;
                    if out_of_attempts {
                        log::warn!(
                            "[RETRY] attempt {}/{} failed, giving up: {}",
                            attempt + 1,
                            self.max_attempts,
                            err
                        );
                        last_err = Some(err);
                        break;
                    }
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "[RETRY] attempt {}/{} failed ({}), backing off {:?}",
                        attempt + 1,
                        self.max_attempts,
                        err,
                        delay
                    );
                    last_err = Some(err);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| AttendanceError::Transport("no attempts were made".to_string())))
    }
}
