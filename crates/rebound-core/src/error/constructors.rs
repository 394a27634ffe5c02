//! Constructor methods for ReboundError

use super::types::ReboundError;

impl ReboundError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an IO error for a specific path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a parse error tagged with the input format
    pub fn parse(message: impl Into<String>, format: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            format: Some(format.into()),
        }
    }
}
