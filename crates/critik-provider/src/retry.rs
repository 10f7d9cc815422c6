//! Bounded retry with an explicit backoff policy.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Delay strategy between failed attempts.
///
/// `None` retries immediately, matching the historical contract of the
/// review pipeline; the other variants exist so callers facing rate-limited
/// providers can space attempts out without changing the retry loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Retry immediately
    None,
    /// Wait the same duration before every retry
    Fixed(Duration),
    /// Multiply the delay after each failed attempt
    Exponential {
        initial: Duration,
        multiplier: f64,
    },
}

impl Backoff {
    /// Delay to observe after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self {
            Backoff::None => None,
            Backoff::Fixed(d) => Some(*d),
            Backoff::Exponential {
                initial,
                multiplier,
            } => {
                let factor = multiplier.powi(attempt.saturating_sub(1) as i32);
                Some(initial.mul_f64(factor))
            }
        }
    }
}

/// Bounded retry policy for provider exchanges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay strategy between attempts
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::None,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt bound and no backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::None,
        }
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run `op` until it succeeds or the attempt bound is reached.
    ///
    /// Each failed attempt short of the last is reported as a warning with
    /// the attempt number and the attempts remaining; the final failure is
    /// returned to the caller instead of being raised further.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    warn!(
                        "Attempt {} failed. There are {} retries left: {}",
                        attempt,
                        max_attempts - attempt,
                        e
                    );
                    if let Some(delay) = self.backoff.delay_for(attempt) {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
