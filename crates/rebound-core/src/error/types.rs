//! Core error types for Rebound

use thiserror::Error;

/// Result type alias for Rebound operations
pub type ReboundResult<T> = Result<T, ReboundError>;

/// Main error type for the non-call parts of Rebound
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReboundError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        format: Option<String>,
    },
}

impl ReboundError {
    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "REBOUND_CONFIG",
            Self::Io { .. } => "REBOUND_IO",
            Self::Parse { .. } => "REBOUND_PARSE",
        }
    }

    /// Get optional context about the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::Parse { format, .. } => format.as_deref(),
        }
    }
}
