//! Top-level resilience configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::env_loader::apply_env_overrides;
use super::file_loader::load_from_file;
use super::logging_config::LoggingConfig;
use crate::error::{ReboundError, ReboundResult};
use crate::recovery::{CircuitBreakerConfig, RetryPolicy};

/// Configuration for the whole resilience layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Applied to every breaker the registry creates
    pub circuit_breaker: CircuitBreakerConfig,
    /// Default retry policy
    pub retry: RetryPolicy,
    pub logging: LoggingConfig,
}

impl ResilienceConfig {
    /// Load configuration from an optional file, then apply environment
    /// overrides and validate the result
    pub fn load(path: Option<&Path>) -> ReboundResult<Self> {
        let mut config = match path {
            Some(path) => load_from_file(path)?,
            None => Self::default(),
        };
        apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the breaker and retry loop cannot run with
    pub fn validate(&self) -> ReboundResult<()> {
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(ReboundError::config_with_context(
                "failure_threshold must be at least 1",
                "circuit_breaker",
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ReboundError::config_with_context(
                "max_attempts must be at least 1",
                "retry",
            ));
        }

        if self.retry.base_delay > self.retry.max_delay {
            return Err(ReboundError::config_with_context(
                format!(
                    "base_delay ({:?}) must not exceed max_delay ({:?})",
                    self.retry.base_delay, self.retry.max_delay
                ),
                "retry",
            ));
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ReboundResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ReboundError::parse(format!("Failed to serialize config: {}", e), "toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResilienceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = ResilienceConfig::default();
        config.circuit_breaker.failure_threshold = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("failure_threshold"));
        assert_eq!(err.context(), Some("circuit_breaker"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = ResilienceConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let mut config = ResilienceConfig::default();
        config.retry.base_delay = Duration::from_secs(30);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_validates_file_contents() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("rebound.toml");
        std::fs::write(&path, "[retry]\nbase_delay = \"1m\"\n").unwrap();

        let err = ResilienceConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("base_delay"));
    }

    #[test]
    fn test_toml_roundtrip_keeps_durations_readable() {
        let config = ResilienceConfig::default();
        let rendered = config.to_toml().unwrap();

        assert!(rendered.contains("reset_timeout = \"1m\""));
        assert!(rendered.contains("base_delay = \"1s\""));

        let parsed: ResilienceConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
