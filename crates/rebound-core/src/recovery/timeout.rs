//! Deadline guard for async operations

use std::future::Future;
use std::time::Duration;

use super::error::RecoveryError;

/// Wait at most `limit` for `operation` to finish
///
/// The operation runs as its own task. If the deadline passes first the
/// caller gets [`RecoveryError::Timeout`] while the operation keeps running
/// in the background and its result is discarded. This bounds the caller's
/// wait; it does not cancel the work. The timer is dropped as soon as either
/// side settles.
///
/// A panic inside the operation is resumed on the caller. A task cancelled
/// by runtime shutdown is reported as a timeout, since its result never
/// arrives.
pub async fn with_timeout<T, E, Fut>(operation: Fut, limit: Duration) -> Result<T, RecoveryError<E>>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut handle = tokio::spawn(operation);

    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(result)) => result.map_err(RecoveryError::Operation),
        Ok(Err(join_error)) => {
            if join_error.is_panic() {
                std::panic::resume_unwind(join_error.into_panic());
            }
            // Only runtime shutdown cancels the task, since the handle is
            // never aborted. No result will arrive, so the caller sees the
            // same outcome as a missed deadline.
            tracing::debug!("Guarded task cancelled before completing");
            Err(RecoveryError::Timeout { limit })
        }
        Err(_) => {
            tracing::debug!(
                limit_ms = limit.as_millis() as u64,
                "Operation exceeded its deadline, detaching"
            );
            Err(RecoveryError::Timeout { limit })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::error::ApiError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::{Instant, sleep};

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_at_deadline() {
        let start = Instant::now();
        let result: Result<(), RecoveryError<ApiError>> = with_timeout(
            async {
                sleep(Duration::from_millis(200)).await;
                Ok(())
            },
            Duration::from_millis(50),
        )
        .await;

        assert_eq!(
            result,
            Err(RecoveryError::Timeout {
                limit: Duration::from_millis(50)
            })
        );
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_passes_through() {
        let ok: Result<u8, RecoveryError<ApiError>> =
            with_timeout(async { Ok(3) }, Duration::from_millis(50)).await;
        assert_eq!(ok.unwrap(), 3);

        let err: Result<u8, _> =
            with_timeout(async { Err(ApiError::new("no_text")) }, Duration::from_millis(50)).await;
        assert_eq!(err, Err(RecoveryError::Operation(ApiError::new("no_text"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_operation_keeps_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let result: Result<(), RecoveryError<ApiError>> = with_timeout(
            async move {
                sleep(Duration::from_millis(200)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
            Duration::from_millis(50),
        )
        .await;
        assert!(result.unwrap_err().is_timeout());
        assert!(!finished.load(Ordering::SeqCst));

        sleep(Duration::from_millis(200)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    #[should_panic(expected = "boom")]
    async fn test_panic_is_resumed() {
        let _: Result<(), RecoveryError<ApiError>> = with_timeout(
            async {
                if Duration::from_secs(1) > Duration::ZERO {
                    panic!("boom");
                }
                Ok(())
            },
            Duration::from_secs(1),
        )
        .await;
    }
}
