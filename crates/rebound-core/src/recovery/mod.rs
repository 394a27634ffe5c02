//! Error recovery layer
//!
//! This module provides resilience for calls to remote dependencies:
//! - Error classification (transient vs fatal) with user-facing guidance
//! - Circuit breakers per logical service, shared through a registry
//! - Bounded retries with exponential backoff
//! - Deadline guard and fallback values

pub mod backoff;
pub mod circuit_breaker;
pub mod classifier;
pub mod error;
pub mod error_recovery;
pub mod events;
pub mod fallback;
pub mod retry;
pub mod timeout;

pub use backoff::{BackoffStrategy, ExponentialBackoff};
pub use circuit_breaker::{
    BreakerRegistry, BreakerStatus, CircuitBreaker, CircuitBreakerConfig, CircuitState,
};
pub use classifier::{ClassifiedError, ErrorClassifier, UNKNOWN_CODE};
pub use error::{ApiError, CIRCUIT_OPEN_CODE, Classifiable, RecoveryError, TIMEOUT_CODE};
pub use error_recovery::ErrorRecovery;
pub use events::{NoopEventSink, RecoveryEvent, RecoveryEventSink, TracingEventSink};
pub use fallback::{with_fallback, with_fallback_options};
pub use retry::{DEFAULT_SERVICE, RetryExecutor, RetryOptions, RetryPolicy};
pub use timeout::with_timeout;
