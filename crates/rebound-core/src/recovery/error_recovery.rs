//! Single entry point bundling breakers, retries, timeouts and fallbacks

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::circuit_breaker::{BreakerRegistry, BreakerStatus};
use super::error::{Classifiable, RecoveryError};
use super::events::{RecoveryEventSink, TracingEventSink};
use super::fallback::with_fallback_options;
use super::retry::{RetryExecutor, RetryOptions, RetryPolicy};
use super::timeout::with_timeout;
use crate::config::ResilienceConfig;

/// Resilience facade over one breaker registry
///
/// Every operation shares the registry this value owns, so two facades never
/// see each other's breakers.
#[derive(Debug)]
pub struct ErrorRecovery {
    registry: Arc<BreakerRegistry>,
    executor: RetryExecutor,
}

impl ErrorRecovery {
    /// Create a facade with default breaker and retry settings
    pub fn new() -> Self {
        Self::from_config(&ResilienceConfig::default())
    }

    /// Create a facade from loaded configuration
    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::with_event_sink(config, Arc::new(TracingEventSink))
    }

    /// Create a facade whose breakers and retries report to `events`
    pub fn with_event_sink(config: &ResilienceConfig, events: Arc<dyn RecoveryEventSink>) -> Self {
        let registry = Arc::new(BreakerRegistry::with_event_sink(
            config.circuit_breaker.clone(),
            events.clone(),
        ));
        let executor =
            RetryExecutor::with_policy(registry.clone(), config.retry.clone()).with_event_sink(events);
        Self { registry, executor }
    }

    pub fn registry(&self) -> &Arc<BreakerRegistry> {
        &self.registry
    }

    /// Default retry policy used when options leave a field unset
    pub fn policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Run `operation` with retries behind the breaker for `service`
    pub async fn execute_with_retry<T, E, F, Fut>(
        &self,
        operation: F,
        options: RetryOptions,
        service: &str,
    ) -> Result<T, RecoveryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classifiable,
    {
        self.executor
            .execute_with_retry(operation, options, service)
            .await
    }

    /// Run `operation` with retries, returning `fallback` if it still fails
    pub async fn with_fallback<T, E, F, Fut>(&self, operation: F, fallback: T, service: &str) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classifiable,
    {
        with_fallback_options(
            &self.executor,
            operation,
            fallback,
            RetryOptions::default(),
            service,
        )
        .await
    }

    /// Bound the caller's wait on `operation` to `limit`
    pub async fn with_timeout<T, E, Fut>(
        &self,
        operation: Fut,
        limit: Duration,
    ) -> Result<T, RecoveryError<E>>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        with_timeout(operation, limit).await
    }

    /// Status of the breaker for `service`, if one has been created
    pub fn circuit_breaker_status(&self, service: &str) -> Option<BreakerStatus> {
        self.registry.get(service).map(|breaker| breaker.status())
    }

    /// Close the breaker for `service`; unknown services are ignored
    pub fn reset_circuit_breaker(&self, service: &str) {
        self.registry.reset(service);
    }

    pub fn all_circuit_breaker_statuses(&self) -> BTreeMap<String, BreakerStatus> {
        self.registry.all_statuses()
    }
}

impl Default for ErrorRecovery {
    fn default() -> Self {
        Self::new()
    }
}
