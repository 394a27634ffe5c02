//! Error classification for recovery decisions
//!
//! Decides whether a failure is transient (worth retrying) or fatal, and
//! attaches a user-facing message plus a suggested remediation. An error is
//! retryable when any of these match:
//! - its code is in the built-in transient set
//! - its code is in the caller-supplied retryable set
//! - its message contains a transient pattern (case-insensitive)
//!
//! Anything else fails fast.

mod table;

use std::collections::HashSet;

use serde::Serialize;

use super::error::{CIRCUIT_OPEN_CODE, Classifiable, RecoveryError};

/// Code reported when the failure carries no code at all
pub const UNKNOWN_CODE: &str = "unknown_error";

/// Classifier output for one failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    /// The code the decision was made for
    pub code: String,
    /// Whether another attempt may succeed
    pub retryable: bool,
    /// What went wrong, phrased for a person
    pub user_message: String,
    /// What to do about it
    pub suggested_action: String,
}

impl ClassifiedError {
    /// Format the classification for display
    pub fn format_display(&self) -> String {
        let kind = if self.retryable {
            "Transient error"
        } else {
            "Error"
        };
        format!(
            "{} ({}): {}\n\nSuggested action: {}",
            kind, self.code, self.user_message, self.suggested_action
        )
    }
}

/// Maps raw errors to retryability and guidance
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    retryable_codes: HashSet<String>,
}

impl ErrorClassifier {
    /// Create a classifier using only the built-in rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier that also treats `codes` as retryable
    pub fn with_retryable_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            retryable_codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Extra retryable codes layered on top of the built-in set
    pub fn retryable_codes(&self) -> impl Iterator<Item = &str> {
        self.retryable_codes.iter().map(String::as_str)
    }

    /// Decide retryability from a code and/or message
    pub fn is_retryable(&self, code: Option<&str>, message: Option<&str>) -> bool {
        if let Some(code) = code {
            if is_transient_code(code) || self.retryable_codes.contains(code) {
                return true;
            }
        }
        message.is_some_and(is_transient_message)
    }

    /// Classify a raw error signal
    pub fn classify(&self, code: Option<&str>, message: Option<&str>) -> ClassifiedError {
        let retryable = self.is_retryable(code, message);
        let code = code.filter(|c| !c.is_empty()).unwrap_or(UNKNOWN_CODE);

        let (user_message, suggested_action) = match table::lookup(code) {
            Some(guidance) => (
                guidance.user_message.to_string(),
                guidance.suggested_action.to_string(),
            ),
            None => (
                format!("An unexpected API error occurred: {}", code),
                "Consult the API documentation for this error code".to_string(),
            ),
        };

        ClassifiedError {
            code: code.to_string(),
            retryable,
            user_message,
            suggested_action,
        }
    }

    /// Classify an operation error
    pub fn classify_error<E: Classifiable + ?Sized>(&self, error: &E) -> ClassifiedError {
        let message = error.error_message();
        let message = (!message.is_empty()).then_some(message.as_ref());
        self.classify(error.error_code(), message)
    }

    /// Classify the failure of a guarded call
    ///
    /// A breaker rejection is fatal no matter which codes the caller marked
    /// retryable: retrying against an open breaker only burns attempts.
    pub fn classify_failure<E: Classifiable>(&self, failure: &RecoveryError<E>) -> ClassifiedError {
        match failure {
            RecoveryError::CircuitOpen { .. } => {
                let mut classified = self.classify(Some(CIRCUIT_OPEN_CODE), None);
                classified.retryable = false;
                classified
            }
            RecoveryError::Timeout { .. } => self.classify_error(failure),
            RecoveryError::Operation(e) => self.classify_error(e),
        }
    }
}

/// Whether `code` is in the built-in transient set
pub fn is_transient_code(code: &str) -> bool {
    table::TRANSIENT_CODES.contains(&code)
}

/// Whether `message` contains a transient failure pattern
pub fn is_transient_message(message: &str) -> bool {
    let message = message.to_lowercase();
    table::TRANSIENT_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}
