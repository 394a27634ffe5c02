//! Failure types for guarded calls

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Failure of a call made through the resilience layer
///
/// Callers can tell a breaker rejection apart from a failure of the
/// operation itself without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError<E> {
    /// The circuit breaker rejected the call without invoking the operation
    CircuitOpen {
        service: String,
        /// Remaining cooldown at the time of rejection, if known
        retry_after: Option<Duration>,
    },
    /// The caller stopped waiting for the operation
    Timeout { limit: Duration },
    /// The operation ran and failed with its own error
    Operation(E),
}

impl<E> RecoveryError<E> {
    /// Whether the breaker rejected this call
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Whether the timeout guard gave up on this call
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Borrow the operation's own error, if that is what failed
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Take the operation's own error, if that is what failed
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Map the operation error, keeping breaker and timeout failures as they are
    pub fn map_operation<F, O>(self, f: O) -> RecoveryError<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Self::CircuitOpen {
                service,
                retry_after,
            } => RecoveryError::CircuitOpen {
                service,
                retry_after,
            },
            Self::Timeout { limit } => RecoveryError::Timeout { limit },
            Self::Operation(e) => RecoveryError::Operation(f(e)),
        }
    }
}

impl<E: fmt::Display> fmt::Display for RecoveryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircuitOpen { service, .. } => {
                write!(f, "Circuit breaker open for service: {}", service)
            }
            Self::Timeout { limit } => {
                write!(f, "Operation timeout after {}ms", limit.as_millis())
            }
            Self::Operation(e) => write!(f, "{}", e),
        }
    }
}

impl<E> std::error::Error for RecoveryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// An error the classifier can inspect
///
/// Implementors expose an optional machine-readable code and a free-text
/// message. Both feed the retryability decision.
pub trait Classifiable {
    /// Machine-readable error code, e.g. `rate_limited`
    fn error_code(&self) -> Option<&str> {
        None
    }

    /// Free-text description, matched case-insensitively against transient patterns
    fn error_message(&self) -> Cow<'_, str>;
}

impl Classifiable for String {
    fn error_message(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Classifiable for &str {
    fn error_message(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Classifiable for std::io::Error {
    fn error_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl<E: Classifiable> Classifiable for RecoveryError<E> {
    fn error_code(&self) -> Option<&str> {
        match self {
            Self::CircuitOpen { .. } => Some(CIRCUIT_OPEN_CODE),
            Self::Timeout { .. } => Some(TIMEOUT_CODE),
            Self::Operation(e) => e.error_code(),
        }
    }

    fn error_message(&self) -> Cow<'_, str> {
        match self {
            Self::CircuitOpen { service, .. } => {
                Cow::Owned(format!("Circuit breaker open for service: {}", service))
            }
            Self::Timeout { limit } => Cow::Owned(format!(
                "Operation timeout after {}ms",
                limit.as_millis()
            )),
            Self::Operation(e) => e.error_message(),
        }
    }
}

/// Code reported for breaker rejections
pub const CIRCUIT_OPEN_CODE: &str = "circuit_open";

/// Code reported for timeout guard expiry
pub const TIMEOUT_CODE: &str = "operation_timeout";

/// Error returned by the chat-platform API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error code as reported by the platform, e.g. `channel_not_found`
    pub code: String,
    /// Optional detail message
    pub message: Option<String>,
}

impl ApiError {
    /// Create an error carrying only a code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }

    /// Create an error with a code and a detail message
    pub fn with_message(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "API error {}: {}", self.code, message),
            None => write!(f, "API error: {}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}

impl Classifiable for ApiError {
    fn error_code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn error_message(&self) -> Cow<'_, str> {
        match &self.message {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Borrowed(""),
        }
    }
}
