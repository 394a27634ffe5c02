//! Integration tests for the resilience layer
//!
//! Drives the public API end to end: classification, breakers shared
//! through the registry, retries, timeouts and fallbacks.

use futures::future::join_all;
use rebound_core::{
    config::ResilienceConfig,
    recovery::{
        ApiError, BreakerRegistry, CircuitBreaker, CircuitBreakerConfig, CircuitState,
        ErrorClassifier, ErrorRecovery, NoopEventSink, RecoveryError, RetryOptions, with_timeout,
    },
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::{Instant, advance, sleep};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn quiet_recovery(config: ResilienceConfig) -> ErrorRecovery {
    ErrorRecovery::with_event_sink(&config, Arc::new(NoopEventSink))
}

/// Full breaker lifecycle: trip, reject, probe, recover
#[tokio::test(start_paused = true)]
async fn test_breaker_lifecycle() {
    init_tracing();
    let breaker = CircuitBreaker::with_config(
        "chat",
        CircuitBreakerConfig::default()
            .with_failure_threshold(3)
            .with_reset_timeout(Duration::from_secs(60)),
    );
    let calls = AtomicU32::new(0);

    for _ in 0..3 {
        let result: Result<(), _> = breaker
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::new("internal_error"))
            })
            .await;
        assert!(matches!(result, Err(RecoveryError::Operation(_))));
    }
    assert_eq!(breaker.state(), CircuitState::Open);

    let rejected: Result<(), RecoveryError<ApiError>> = breaker
        .execute(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;
    match rejected {
        Err(RecoveryError::CircuitOpen {
            service,
            retry_after,
        }) => {
            assert_eq!(service, "chat");
            assert_eq!(retry_after, Some(Duration::from_secs(60)));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    advance(Duration::from_secs(60)).await;
    assert!(breaker.is_available());

    let probe: Result<&str, RecoveryError<ApiError>> =
        breaker.execute(|| async { Ok("recovered") }).await;
    assert_eq!(probe.unwrap(), "recovered");
    assert_eq!(breaker.state(), CircuitState::Closed);

    let status = breaker.status();
    assert_eq!(status.consecutive_failures, 0);
    assert_eq!(status.total_calls, 4);
    assert_eq!(status.total_failures, 3);
    assert_eq!(status.total_rejections, 1);
}

/// Many tasks asking for the same service share one breaker
#[tokio::test]
async fn test_registry_shared_across_tasks() {
    let registry = Arc::new(BreakerRegistry::new());

    let handles = (0..32).map(|_| {
        let registry = registry.clone();
        tokio::spawn(async move { registry.get_or_create("files") })
    });
    let breakers: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(registry.len(), 1);
    assert!(breakers.iter().all(|b| Arc::ptr_eq(b, &breakers[0])));
}

/// Transient failures are retried with doubling waits before succeeding
#[tokio::test(start_paused = true)]
async fn test_retry_recovers_from_rate_limiting() {
    let recovery = quiet_recovery(ResilienceConfig::default());
    let attempts = AtomicU32::new(0);
    let start = Instant::now();

    let result = recovery
        .execute_with_retry(
            || async {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ApiError::with_message("rate_limited", "slow down"))
                } else {
                    Ok(7)
                }
            },
            RetryOptions::new().base_delay(Duration::from_millis(100)),
            "chat",
        )
        .await;

    assert_eq!(result.unwrap(), 7);
    assert_eq!(start.elapsed(), Duration::from_millis(300));
    let status = recovery.circuit_breaker_status("chat").unwrap();
    assert_eq!(status.state, CircuitState::Closed);
    assert_eq!(status.consecutive_failures, 0);
}

/// A timeout composed inside the retry loop counts as a transient failure
#[tokio::test(start_paused = true)]
async fn test_timeout_inside_retry_is_retried() {
    let recovery = quiet_recovery(ResilienceConfig::default());
    let attempts = Arc::new(AtomicU32::new(0));

    let result = recovery
        .execute_with_retry(
            || {
                let attempts = attempts.clone();
                with_timeout(
                    async move {
                        if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                            sleep(Duration::from_secs(5)).await;
                        }
                        Ok::<_, ApiError>("done")
                    },
                    Duration::from_millis(50),
                )
            },
            RetryOptions::default(),
            "search",
        )
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

/// Fallback hides failures from the caller but the breaker still records them
#[tokio::test(start_paused = true)]
async fn test_fallback_after_breaker_opens() {
    let mut config = ResilienceConfig::default();
    config.circuit_breaker.failure_threshold = 2;
    config.retry.max_attempts = 1;
    let recovery = quiet_recovery(config);

    let mut values = Vec::new();
    for _ in 0..3 {
        values.push(
            recovery
                .with_fallback(
                    || async { Err::<&str, _>(ApiError::new("service_unavailable")) },
                    "cached",
                    "users",
                )
                .await,
        );
    }

    assert_eq!(values, vec!["cached"; 3]);
    let status = recovery.circuit_breaker_status("users").unwrap();
    assert_eq!(status.state, CircuitState::Open);
    assert_eq!(status.total_failures, 2);
    assert_eq!(status.total_rejections, 1);
}

#[test]
fn test_classifier_guidance() {
    let classifier = ErrorClassifier::new();

    let classified = classifier.classify(Some("not_in_channel"), None);
    assert!(!classified.retryable);
    assert!(!classified.user_message.is_empty());
    assert!(!classified.suggested_action.is_empty());

    let classified = classifier.classify(None, Some("Connection reset by peer"));
    assert!(classified.retryable);
    assert_eq!(classified.code, "unknown_error");
}
