//! Environment variable overrides

use std::env;
use std::str::FromStr;
use std::time::Duration;

use humantime_serde::re::humantime;

use super::resilience_config::ResilienceConfig;
use crate::error::{ReboundError, ReboundResult};

pub const ENV_FAILURE_THRESHOLD: &str = "REBOUND_FAILURE_THRESHOLD";
pub const ENV_RESET_TIMEOUT: &str = "REBOUND_RESET_TIMEOUT";
pub const ENV_MONITORING_PERIOD: &str = "REBOUND_MONITORING_PERIOD";
pub const ENV_MAX_ATTEMPTS: &str = "REBOUND_MAX_ATTEMPTS";
pub const ENV_BASE_DELAY: &str = "REBOUND_BASE_DELAY";
pub const ENV_MAX_DELAY: &str = "REBOUND_MAX_DELAY";
pub const ENV_LOG_LEVEL: &str = "REBOUND_LOG_LEVEL";

/// Apply `REBOUND_*` environment variables on top of `config`
pub fn apply_env_overrides(config: &mut ResilienceConfig) -> ReboundResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides read through `lookup`
///
/// Durations accept humantime syntax such as `30s` or `250ms`.
pub fn apply_overrides_from<L>(config: &mut ResilienceConfig, lookup: L) -> ReboundResult<()>
where
    L: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_FAILURE_THRESHOLD) {
        config.circuit_breaker.failure_threshold = parse_number(ENV_FAILURE_THRESHOLD, &value)?;
    }
    if let Some(value) = lookup(ENV_RESET_TIMEOUT) {
        config.circuit_breaker.reset_timeout = parse_duration(ENV_RESET_TIMEOUT, &value)?;
    }
    if let Some(value) = lookup(ENV_MONITORING_PERIOD) {
        config.circuit_breaker.monitoring_period = parse_duration(ENV_MONITORING_PERIOD, &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_ATTEMPTS) {
        config.retry.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &value)?;
    }
    if let Some(value) = lookup(ENV_BASE_DELAY) {
        config.retry.base_delay = parse_duration(ENV_BASE_DELAY, &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_DELAY) {
        config.retry.max_delay = parse_duration(ENV_MAX_DELAY, &value)?;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ReboundResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ReboundError::config(format!("Invalid {} value: {}", key, value)))
}

fn parse_duration(key: &str, value: &str) -> ReboundResult<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| ReboundError::config(format!("Invalid {} value '{}': {}", key, value, e)))
}
