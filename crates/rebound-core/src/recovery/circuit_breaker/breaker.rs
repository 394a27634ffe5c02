//! Circuit breaker implementation

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::types::{BreakerStatus, CircuitBreakerConfig, CircuitState};
use crate::recovery::error::RecoveryError;
use crate::recovery::events::{RecoveryEvent, RecoveryEventSink, TracingEventSink};

/// Mutable breaker state, always accessed under one lock
#[derive(Debug, Clone, Default)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure_at: Option<Instant>,
    next_attempt_at: Option<Instant>,
    probe_in_flight: bool,
    total_calls: u64,
    total_failures: u64,
    total_rejections: u64,
}

/// How a call got past the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Normal,
    Probe,
}

/// Circuit breaker for protecting against a failing dependency
pub struct CircuitBreaker {
    /// Service name (for logging and status)
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
    events: Arc<dyn RecoveryEventSink>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default config
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom config
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self::with_event_sink(name, config, Arc::new(TracingEventSink))
    }

    /// Create a circuit breaker reporting to a specific event sink
    pub fn with_event_sink(
        name: impl Into<String>,
        config: CircuitBreakerConfig,
        events: Arc<dyn RecoveryEventSink>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner::default()),
            events,
        }
    }

    /// Get the service name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Get the current state without triggering any transition
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// False only while open and the reset timeout has not elapsed
    ///
    /// A half-open breaker reports available even while its probe is in
    /// flight, although a second caller would be rejected until it settles.
    pub fn is_available(&self) -> bool {
        let inner = self.inner.lock();
        Self::available(&inner, Instant::now())
    }

    /// Execute an operation with circuit breaker protection
    ///
    /// Rejections come back as [`RecoveryError::CircuitOpen`] without the
    /// operation being invoked. Operation failures come back as
    /// [`RecoveryError::Operation`] after the breaker recorded them.
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, RecoveryError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = self
            .admit()
            .map_err(|retry_after| RecoveryError::CircuitOpen {
                service: self.name.clone(),
                retry_after,
            })?;

        let mut probe = ProbeSlot {
            breaker: self,
            held: admission == Admission::Probe,
        };
        let outcome = operation().await;
        probe.held = false;

        match outcome {
            Ok(value) => {
                self.record_success(admission);
                Ok(value)
            }
            Err(error) => {
                self.record_failure(admission);
                Err(RecoveryError::Operation(error))
            }
        }
    }

    /// Get a snapshot of the breaker for observability
    pub fn status(&self) -> BreakerStatus {
        let inner = self.inner.lock();
        BreakerStatus {
            service: self.name.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            last_failure_at: inner.last_failure_at,
            next_attempt_at: inner.next_attempt_at,
            is_available: Self::available(&inner, Instant::now()),
            total_calls: inner.total_calls,
            total_failures: inner.total_failures,
            total_rejections: inner.total_rejections,
        }
    }

    /// Manually reset the circuit breaker to closed state
    ///
    /// Lifetime totals are kept. Calls already in flight are unaffected;
    /// their results are applied against the reset state.
    pub fn reset(&self) {
        let from = {
            let mut inner = self.inner.lock();
            let from = inner.state;
            inner.state = CircuitState::Closed;
            inner.consecutive_failures = 0;
            inner.last_failure_at = None;
            inner.next_attempt_at = None;
            inner.probe_in_flight = false;
            from
        };

        if from != CircuitState::Closed {
            tracing::info!(circuit = %self.name, "Circuit breaker manually reset");
            self.emit(vec![self.transition(from, CircuitState::Closed)]);
        }
    }

    fn available(inner: &BreakerInner, now: Instant) -> bool {
        match (inner.state, inner.next_attempt_at) {
            (CircuitState::Open, Some(at)) => now >= at,
            _ => true,
        }
    }

    /// Decide whether a call may proceed. On rejection returns the remaining
    /// cooldown, if there is one.
    fn admit(&self) -> Result<Admission, Option<Duration>> {
        let now = Instant::now();
        let mut events = Vec::new();

        let admission = {
            let mut inner = self.inner.lock();
            let admission = match inner.state {
                CircuitState::Closed => Ok(Admission::Normal),
                CircuitState::Open => match inner.next_attempt_at {
                    Some(at) if now < at => Err(Some(at - now)),
                    _ => {
                        inner.state = CircuitState::HalfOpen;
                        inner.next_attempt_at = None;
                        inner.probe_in_flight = true;
                        events.push(self.transition(CircuitState::Open, CircuitState::HalfOpen));
                        Ok(Admission::Probe)
                    }
                },
                CircuitState::HalfOpen if inner.probe_in_flight => Err(None),
                CircuitState::HalfOpen => {
                    inner.probe_in_flight = true;
                    Ok(Admission::Probe)
                }
            };
            match admission {
                Ok(_) => inner.total_calls += 1,
                Err(_) => inner.total_rejections += 1,
            }
            admission
        };

        if let Err(retry_after) = &admission {
            tracing::debug!(
                circuit = %self.name,
                retry_after_ms = retry_after.map(|d| d.as_millis() as u64),
                "Circuit breaker rejected call"
            );
        }
        self.emit(events);
        admission
    }

    /// Record a successful operation
    fn record_success(&self, admission: Admission) {
        let mut events = Vec::new();
        {
            let mut inner = self.inner.lock();
            match (inner.state, admission) {
                (CircuitState::Closed, _) => {
                    inner.consecutive_failures = 0;
                }
                (CircuitState::HalfOpen, Admission::Probe) => {
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.probe_in_flight = false;
                    events.push(self.transition(CircuitState::HalfOpen, CircuitState::Closed));
                }
                // Late result of a call admitted before the breaker opened
                _ => {}
            }
        }
        self.emit(events);
    }

    /// Record a failed operation
    fn record_failure(&self, admission: Admission) {
        let now = Instant::now();
        let mut events = Vec::new();
        {
            let mut inner = self.inner.lock();
            inner.total_failures += 1;

            match (inner.state, admission) {
                (CircuitState::Closed, _) => {
                    let stale = inner
                        .last_failure_at
                        .is_some_and(|last| now.duration_since(last) > self.config.monitoring_period);
                    if stale {
                        inner.consecutive_failures = 0;
                    }
                    inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                    inner.last_failure_at = Some(now);

                    if inner.consecutive_failures >= self.config.failure_threshold.max(1) {
                        self.trip(&mut inner, now, CircuitState::Closed, &mut events);
                    }
                }
                (CircuitState::HalfOpen, Admission::Probe) => {
                    inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                    inner.last_failure_at = Some(now);
                    inner.probe_in_flight = false;
                    self.trip(&mut inner, now, CircuitState::HalfOpen, &mut events);
                }
                _ => {
                    inner.last_failure_at = Some(now);
                }
            }
        }
        self.emit(events);
    }

    fn trip(
        &self,
        inner: &mut BreakerInner,
        now: Instant,
        from: CircuitState,
        events: &mut Vec<RecoveryEvent>,
    ) {
        inner.state = CircuitState::Open;
        inner.next_attempt_at = Some(reopen_at(now, self.config.reset_timeout));

        events.push(self.transition(from, CircuitState::Open));
        events.push(RecoveryEvent::CircuitOpen {
            service: self.name.clone(),
            consecutive_failures: inner.consecutive_failures,
            retry_after: self.config.reset_timeout,
        });
    }

    fn transition(&self, from: CircuitState, to: CircuitState) -> RecoveryEvent {
        RecoveryEvent::StateTransition {
            service: self.name.clone(),
            from,
            to,
        }
    }

    fn emit(&self, events: Vec<RecoveryEvent>) {
        for event in events {
            self.events.handle_event(event);
        }
    }
}

/// Instant at which an open breaker admits its probe
///
/// Saturates to a far-future instant when `reset_timeout` does not fit.
fn reopen_at(now: Instant, reset_timeout: Duration) -> Instant {
    now.checked_add(reset_timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Roughly 30 years
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Releases the half-open probe slot if the probe future is dropped before
/// it settles, so the breaker does not stay half-open forever.
struct ProbeSlot<'a> {
    breaker: &'a CircuitBreaker,
    held: bool,
}

impl Drop for ProbeSlot<'_> {
    fn drop(&mut self) {
        if self.held {
            let mut inner = self.breaker.inner.lock();
            if inner.state == CircuitState::HalfOpen {
                inner.probe_in_flight = false;
            }
        }
    }
}
