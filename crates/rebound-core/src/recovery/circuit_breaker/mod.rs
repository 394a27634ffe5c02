//! Circuit breaker pattern for fault tolerance
//!
//! Stops calling a failing dependency for a cooldown period, then lets a
//! single probe through to test whether it recovered.

mod breaker;
mod registry;
mod types;

// Re-export all public items
pub use breaker::CircuitBreaker;
pub use registry::BreakerRegistry;
pub use types::{BreakerStatus, CircuitBreakerConfig, CircuitState};
