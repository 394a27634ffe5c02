//! Rebound
//!
//! Resilience for chat-platform API clients: per-service circuit breakers,
//! bounded retries with exponential backoff, timeouts and fallbacks.
//!
//! ```no_run
//! use rebound::{ApiError, ErrorRecovery, RetryOptions};
//!
//! # async fn run() {
//! let recovery = ErrorRecovery::new();
//! let posted = recovery
//!     .execute_with_retry(
//!         || async { Ok::<_, ApiError>("ts-1700000000.000100") },
//!         RetryOptions::new().max_attempts(5),
//!         "chat.postMessage",
//!     )
//!     .await;
//! # let _ = posted;
//! # }
//! ```

pub use rebound_core::*;
