//! Backoff strategies for retry operations

use std::time::Duration;

/// Backoff strategy trait
pub trait BackoffStrategy: Send + Sync {
    /// Get the delay after the given failed attempt (1-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// Doubling backoff with a ceiling
///
/// Attempt 1 waits `initial_delay`, attempt 2 twice that, and so on, never
/// more than `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
}

impl ExponentialBackoff {
    /// Create a doubling backoff
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(10))
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 2u32.saturating_pow(exponent);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}
