//! Circuit breaker types and configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Circuit breaker state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Circuit is closed, operations proceed normally
    #[default]
    Closed,
    /// Circuit is open, operations are rejected
    Open,
    /// Circuit is half-open, one probe is allowed to test recovery
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening the circuit
    pub failure_threshold: u32,
    /// Time to stay open before letting a probe through
    #[serde(with = "humantime_serde")]
    pub reset_timeout: Duration,
    /// Failures older than this no longer count toward the threshold
    #[serde(with = "humantime_serde")]
    pub monitoring_period: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(60),
            monitoring_period: Duration::from_secs(300),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    pub fn with_monitoring_period(mut self, period: Duration) -> Self {
        self.monitoring_period = period;
        self
    }
}

/// Point-in-time snapshot of a circuit breaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerStatus {
    pub service: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub last_failure_at: Option<Instant>,
    /// Set only while open
    pub next_attempt_at: Option<Instant>,
    /// False only while open and still cooling down
    pub is_available: bool,
    pub total_calls: u64,
    pub total_failures: u64,
    pub total_rejections: u64,
}

impl BreakerStatus {
    /// Remaining cooldown before the breaker admits a probe
    pub fn retry_after(&self) -> Option<Duration> {
        self.next_attempt_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Failure rate over the breaker's lifetime, as a percentage
    pub fn failure_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            (self.total_failures as f64 / self.total_calls as f64) * 100.0
        }
    }
}
