//! Registry of circuit breakers, one per logical service

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::breaker::CircuitBreaker;
use super::types::{BreakerStatus, CircuitBreakerConfig};
use crate::recovery::events::{RecoveryEventSink, TracingEventSink};

/// Collection of circuit breakers keyed by service name
///
/// Breakers are created lazily on first use and never removed, so every
/// call site naming the same service shares one breaker.
pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: CircuitBreakerConfig,
    events: Arc<dyn RecoveryEventSink>,
}

impl BreakerRegistry {
    /// Create a new registry with default config
    pub fn new() -> Self {
        Self::with_config(CircuitBreakerConfig::default())
    }

    /// Create a registry with custom default config
    pub fn with_config(config: CircuitBreakerConfig) -> Self {
        Self::with_event_sink(config, Arc::new(TracingEventSink))
    }

    /// Create a registry whose breakers report to `events`
    pub fn with_event_sink(
        config: CircuitBreakerConfig,
        events: Arc<dyn RecoveryEventSink>,
    ) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config: config,
            events,
        }
    }

    pub fn default_config(&self) -> &CircuitBreakerConfig {
        &self.default_config
    }

    /// Get or create the circuit breaker for a service
    pub fn get_or_create(&self, name: &str) -> Arc<CircuitBreaker> {
        self.get_or_create_with_config(name, self.default_config.clone())
    }

    /// Get or create with custom config
    ///
    /// `config` only applies if this call creates the breaker.
    pub fn get_or_create_with_config(
        &self,
        name: &str,
        config: CircuitBreakerConfig,
    ) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(name) {
            return existing.clone();
        }

        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(circuit = %name, "Creating circuit breaker");
                Arc::new(CircuitBreaker::with_event_sink(
                    name,
                    config,
                    self.events.clone(),
                ))
            })
            .clone()
    }

    /// Get an existing circuit breaker
    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).map(|entry| entry.value().clone())
    }

    /// Get all circuit breaker names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.breakers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Get status for all circuit breakers, ordered by service name
    pub fn all_statuses(&self) -> BTreeMap<String, BreakerStatus> {
        self.breakers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status()))
            .collect()
    }

    /// Reset one circuit breaker; unknown names are ignored
    pub fn reset(&self, name: &str) {
        if let Some(breaker) = self.get(name) {
            breaker.reset();
        }
    }

    /// Reset all circuit breakers
    pub fn reset_all(&self) {
        for breaker in self.breakers.iter().map(|e| e.value().clone()).collect::<Vec<_>>() {
            breaker.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

impl Default for BreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BreakerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakerRegistry")
            .field("services", &self.names())
            .field("default_config", &self.default_config)
            .finish()
    }
}
