//! Bounded retry with linear backoff for VIES calls.
//!
//! Negative answers (`InvalidFormat`, `NotFound`) end the loop at once.
//! Anything else is retried, sleeping 1s, 2s, 3s, ... between attempts.
//! A rate limit that survives the last attempt is reported as
//! `ServiceUnavailable`.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::core::VatError;

/// Outcome of a single VIES attempt, before retry translation.
#[derive(Debug, Error)]
pub(super) enum AttemptError {
    #[error(transparent)]
    Vat(#[from] VatError),

    /// VIES refused the request because too many are in flight.
    #[error("rate limit exceeded ({0})")]
    RateLimited(String),
}

impl AttemptError {
    fn is_authoritative(&self) -> bool {
        matches!(self, Self::Vat(e) if e.is_authoritative())
    }

    fn into_vat_error(self) -> VatError {
        match self {
            Self::Vat(e) => e,
            Self::RateLimited(code) => {
                VatError::unavailable(format!("rate limit exceeded ({code})"))
            }
        }
    }
}

/// How many times a VIES check is attempted.
///
/// `retries` is the total attempt budget; 0 and 1 both mean a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    retries: u32,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self { retries }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Total number of attempts, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.retries.max(1)
    }

    /// Delay after the failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_secs(u64::from(attempt))
    }

    /// Run `attempt` until it succeeds, fails authoritatively, or the
    /// budget is spent.
    ///
    /// The backoff sleep is an ordinary `tokio::time::sleep`, so dropping
    /// the returned future abandons the wait immediately.
    pub(super) async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, VatError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let max_attempts = self.max_attempts();
        let mut n = 1;
        loop {
            let err = match attempt().await {
                Ok(v) => return Ok(v),
                Err(e) => e,
            };

            if err.is_authoritative() || n >= max_attempts {
                return Err(err.into_vat_error());
            }

            let delay = self.delay_after(n);
            tracing::warn!(
                attempt = n,
                max_attempts,
                ?delay,
                error = %err,
                "VIES check failed, retrying"
            );
            tokio::time::sleep(delay).await;
            n += 1;
        }
    }
}
