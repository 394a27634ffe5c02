//! Retry policies and the retry executor
//!
//! Every attempt goes through the circuit breaker registered for the target
//! service. Failures are classified after each attempt: fatal errors and
//! breaker rejections stop the loop at once, transient errors back off
//! exponentially until attempts run out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use super::backoff::{BackoffStrategy, ExponentialBackoff};
use super::circuit_breaker::BreakerRegistry;
use super::classifier::ErrorClassifier;
use super::error::{Classifiable, RecoveryError};
use super::events::{RecoveryEvent, RecoveryEventSink, TracingEventSink};

/// Service name used when the caller does not name one
pub const DEFAULT_SERVICE: &str = "default";

/// Retry behavior for one call
///
/// # Example
/// ```
/// use rebound_core::recovery::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_max_attempts(5)
///     .with_base_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(10));
/// assert_eq!(policy.backoff_delay(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Ceiling for any single delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Codes retried in addition to the classifier's built-in transient set
    pub retryable_error_codes: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            retryable_error_codes: Vec::new(),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with limited attempts
    pub fn limited(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Create a policy that never retries
    pub fn no_retry() -> Self {
        Self::limited(1)
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_retryable_error_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retryable_error_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Overlay per-call options; unset fields keep this policy's values
    pub fn merge(&self, options: &RetryOptions) -> Self {
        Self {
            max_attempts: options.max_attempts.unwrap_or(self.max_attempts),
            base_delay: options.base_delay.unwrap_or(self.base_delay),
            max_delay: options.max_delay.unwrap_or(self.max_delay),
            retryable_error_codes: options
                .retryable_error_codes
                .clone()
                .unwrap_or_else(|| self.retryable_error_codes.clone()),
        }
    }

    /// Attempts actually made; zero is treated as one
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Create the backoff strategy for this policy
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.base_delay, self.max_delay)
    }

    /// Delay after failed attempt `attempt` (1-indexed)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff().delay_for_attempt(attempt)
    }

    /// Create a classifier honoring this policy's extra retryable codes
    pub fn classifier(&self) -> ErrorClassifier {
        ErrorClassifier::with_retryable_codes(self.retryable_error_codes.iter().cloned())
    }
}

/// Per-call overrides for a [`RetryPolicy`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryOptions {
    pub max_attempts: Option<u32>,
    pub base_delay: Option<Duration>,
    pub max_delay: Option<Duration>,
    pub retryable_error_codes: Option<Vec<String>>,
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    pub fn retryable_error_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retryable_error_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }
}

/// Runs operations with bounded retries behind per-service circuit breakers
pub struct RetryExecutor {
    registry: Arc<BreakerRegistry>,
    policy: RetryPolicy,
    events: Arc<dyn RecoveryEventSink>,
}

impl RetryExecutor {
    /// Create an executor with the default policy
    pub fn new(registry: Arc<BreakerRegistry>) -> Self {
        Self::with_policy(registry, RetryPolicy::default())
    }

    /// Create an executor with a custom default policy
    pub fn with_policy(registry: Arc<BreakerRegistry>, policy: RetryPolicy) -> Self {
        Self {
            registry,
            policy,
            events: Arc::new(TracingEventSink),
        }
    }

    /// Report retry events to `events` instead of `tracing`
    pub fn with_event_sink(mut self, events: Arc<dyn RecoveryEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn registry(&self) -> &Arc<BreakerRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute an operation with the default policy
    pub async fn execute<T, E, F, Fut>(
        &self,
        operation: F,
        service: &str,
    ) -> Result<T, RecoveryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classifiable,
    {
        self.execute_with_retry(operation, RetryOptions::default(), service)
            .await
    }

    /// Execute an operation with retries
    ///
    /// Returns the first success, the first non-retryable failure, or the
    /// failure of the last allowed attempt, unchanged.
    pub async fn execute_with_retry<T, E, F, Fut>(
        &self,
        mut operation: F,
        options: RetryOptions,
        service: &str,
    ) -> Result<T, RecoveryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classifiable,
    {
        let policy = self.policy.merge(&options);
        let max_attempts = policy.effective_max_attempts();
        let classifier = policy.classifier();
        let backoff = policy.backoff();
        let breaker = self.registry.get_or_create(service);

        let mut attempt = 1;
        loop {
            let error = match breaker.execute(|| operation()).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(service, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts {
                tracing::debug!(service, attempt, "Retry attempts exhausted");
                return Err(error);
            }

            let classified = classifier.classify_failure(&error);
            if !classified.retryable {
                tracing::debug!(
                    service,
                    attempt,
                    code = %classified.code,
                    "Not retrying non-transient failure"
                );
                return Err(error);
            }

            let delay = backoff.delay_for_attempt(attempt);
            self.events.handle_event(RecoveryEvent::RetryAttempt {
                service: service.to_string(),
                attempt,
                max_attempts,
                delay,
                code: classified.code,
            });

            sleep(delay).await;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .finish()
    }
}
