//! Fixed-delay retry for calls the application may reject while busy.

use crate::error::AutomationError;
use std::time::Duration;
use tracing::warn;

/// Bounded attempts with a constant pause in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Pause after a busy failure.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds, fails with a non-busy error, or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number. `what` names the operation in log lines.
    pub fn run<T, F>(&self, what: &str, mut op: F) -> Retried<T>
    where
        F: FnMut(u32) -> Result<T, AutomationError>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt) {
                Ok(value) => {
                    return Retried {
                        attempts: attempt,
                        outcome: Ok(value),
                    }
                }
                Err(err) if err.is_busy() => {
                    warn!(
                        "Error {} (attempt {} of {}): {}",
                        what, attempt, self.max_attempts, err.message
                    );
                    if attempt >= self.max_attempts {
                        return Retried {
                            attempts: attempt,
                            outcome: Err(RetryError::Exhausted(err)),
                        };
                    }
                    warn!("Retrying in {} ms...", self.delay.as_millis());
                    std::thread::sleep(self.delay);
                }
                Err(err) => {
                    return Retried {
                        attempts: attempt,
                        outcome: Err(RetryError::Permanent(err)),
                    }
                }
            }
        }
    }
}

/// Why a retried operation gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// Every attempt was rejected as busy; holds the last error.
    Exhausted(AutomationError),
    /// A non-busy error stopped the loop.
    Permanent(AutomationError),
}

/// Outcome of a retried operation plus how many attempts it took.
#[derive(Debug)]
pub struct Retried<T> {
    pub attempts: u32,
    pub outcome: Result<T, RetryError>,
}
