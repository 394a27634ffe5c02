//! Recovery events and sinks
//!
//! The breaker and the retry executor report what they do through an
//! injected [`RecoveryEventSink`] instead of a global logger, so tests can
//! capture events and hosts can route them anywhere.

use std::time::Duration;

use super::circuit_breaker::CircuitState;

/// Something the resilience layer did that an operator may care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// A breaker moved between states
    StateTransition {
        service: String,
        from: CircuitState,
        to: CircuitState,
    },
    /// A failed attempt is about to be retried after `delay`
    RetryAttempt {
        service: String,
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
        code: String,
    },
    /// A breaker opened and will reject calls for `retry_after`
    CircuitOpen {
        service: String,
        consecutive_failures: u32,
        retry_after: Duration,
    },
}

impl RecoveryEvent {
    /// Stable event name used as the `event` log field
    pub fn name(&self) -> &'static str {
        match self {
            Self::StateTransition { .. } => "state_transition",
            Self::RetryAttempt { .. } => "retry_attempt",
            Self::CircuitOpen { .. } => "circuit_open",
        }
    }

    /// Service the event belongs to
    pub fn service(&self) -> &str {
        match self {
            Self::StateTransition { service, .. }
            | Self::RetryAttempt { service, .. }
            | Self::CircuitOpen { service, .. } => service,
        }
    }
}

/// Receiver for recovery events
pub trait RecoveryEventSink: Send + Sync {
    /// Handle one event. Called synchronously from the reporting call path,
    /// never while a breaker lock is held.
    fn handle_event(&self, event: RecoveryEvent);
}

/// Sink that writes every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl RecoveryEventSink for TracingEventSink {
    fn handle_event(&self, event: RecoveryEvent) {
        let name = event.name();
        match event {
            RecoveryEvent::StateTransition { service, from, to } => {
                tracing::info!(
                    event = name,
                    service = %service,
                    from = %from,
                    to = %to,
                    "Circuit breaker state changed"
                );
            }
            RecoveryEvent::RetryAttempt {
                service,
                attempt,
                max_attempts,
                delay,
                code,
            } => {
                tracing::warn!(
                    event = name,
                    service = %service,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    code = %code,
                    "Retrying after transient failure"
                );
            }
            RecoveryEvent::CircuitOpen {
                service,
                consecutive_failures,
                retry_after,
            } => {
                tracing::warn!(
                    event = name,
                    service = %service,
                    consecutive_failures,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Circuit breaker opened after {} failures",
                    consecutive_failures
                );
            }
        }
    }
}

/// A no-op sink for when events are not wanted
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl RecoveryEventSink for NoopEventSink {
    fn handle_event(&self, _event: RecoveryEvent) {}
}
