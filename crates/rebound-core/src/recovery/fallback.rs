//! Fallback values for exhausted recovery

use std::future::Future;

use super::classifier::UNKNOWN_CODE;
use super::error::Classifiable;
use super::retry::{RetryExecutor, RetryOptions};

/// Run `operation` through the retry executor, returning `fallback` if it
/// ultimately fails. Never fails itself.
pub async fn with_fallback<T, E, F, Fut>(
    executor: &RetryExecutor,
    operation: F,
    fallback: T,
    service: &str,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classifiable,
{
    with_fallback_options(executor, operation, fallback, RetryOptions::default(), service).await
}

/// Like [`with_fallback`] with per-call retry options
pub async fn with_fallback_options<T, E, F, Fut>(
    executor: &RetryExecutor,
    operation: F,
    fallback: T,
    options: RetryOptions,
    service: &str,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classifiable,
{
    match executor.execute_with_retry(operation, options, service).await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                service,
                code = error.error_code().unwrap_or(UNKNOWN_CODE),
                error = %error.error_message(),
                "Recovery exhausted, using fallback value"
            );
            fallback
        }
    }
}
