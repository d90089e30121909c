//! Bounded render retry
//!
//! Render calls can fail transiently. They are retried a fixed number of
//! times with exponential backoff, and exhaustion is reported as an error.

use std::time::Duration;

use thiserror::Error;

use crate::core::RenderSettings;
use crate::render::host::HostError;

/// Upper bound on a single backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Render failures that survived every retry
#[derive(Error, Debug)]
pub enum RenderError {
    /// Every attempt failed
    #[error("render failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last: HostError,
    },
}

/// Attempt budget and delay schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Policy described by render settings
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.max_render_attempts, settings.retry_backoff())
    }

    /// Total attempts allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Run `operation` until it succeeds or the budget is spent
    ///
    /// The closure receives the 1-based attempt number.
    pub fn run<T, F>(&self, mut operation: F) -> Result<T, RenderError>
    where
        F: FnMut(u32) -> Result<T, HostError>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    log::error!("Render attempt {}/{} failed: {}", attempt, self.max_attempts, e);
                    return Err(RenderError::Exhausted { attempts: attempt, last: e });
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "Render attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
