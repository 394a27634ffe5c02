//! Rebound core library
//!
//! Resilience primitives for code that talks to flaky remote services:
//! error classification, per-service circuit breakers, retries with
//! backoff, timeouts and fallbacks, plus the configuration that drives them.

pub mod config;
pub mod error;
pub mod recovery;

pub use config::{LoggingConfig, ResilienceConfig};
pub use error::{ReboundError, ReboundResult};
pub use recovery::{
    ApiError, BreakerRegistry, BreakerStatus, CircuitBreaker, CircuitBreakerConfig, CircuitState,
    Classifiable, ClassifiedError, ErrorClassifier, ErrorRecovery, RecoveryError, RecoveryEvent,
    RecoveryEventSink, RetryExecutor, RetryOptions, RetryPolicy, with_fallback, with_timeout,
};
