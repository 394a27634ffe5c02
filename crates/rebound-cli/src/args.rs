//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rebound")]
#[command(about = "Rebound - circuit breaking, retries and fallbacks for API calls")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "REBOUND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how an error code and message would be classified
    Classify {
        /// Error code returned by the API, e.g. rate_limited
        code: String,

        /// Error message to match against transient patterns
        #[arg(long, short)]
        message: Option<String>,

        /// Extra codes to treat as retryable
        #[arg(long = "retryable-code")]
        retryable_codes: Vec<String>,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive a simulated flaky dependency through retries and the breaker
    Simulate {
        /// Number of invocations that fail before the dependency recovers
        #[arg(long, default_value_t = 3)]
        failures: u32,

        /// Error code reported by failing invocations
        #[arg(long, default_value = "service_unavailable")]
        code: String,

        /// Number of calls to make
        #[arg(long, default_value_t = 3)]
        calls: u32,

        /// Service name for the circuit breaker
        #[arg(long, default_value = "default")]
        service: String,

        /// Return this value instead of failing
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify() {
        let cli = Cli::parse_from([
            "rebound",
            "classify",
            "channel_not_found",
            "--retryable-code",
            "channel_not_found",
            "--retryable-code",
            "no_text",
        ]);

        match cli.command {
            Commands::Classify {
                code,
                message,
                retryable_codes,
                json,
            } => {
                assert_eq!(code, "channel_not_found");
                assert!(message.is_none());
                assert_eq!(retryable_codes, vec!["channel_not_found", "no_text"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_simulate_defaults_and_globals() {
        let cli = Cli::parse_from(["rebound", "simulate", "--calls", "5", "-v"]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Simulate {
                failures,
                code,
                calls,
                service,
                fallback,
            } => {
                assert_eq!(failures, 3);
                assert_eq!(code, "service_unavailable");
                assert_eq!(calls, 5);
                assert_eq!(service, "default");
                assert!(fallback.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::parse_from(["rebound", "config", "--config", "rebound.yaml"]);
        assert_eq!(cli.config, Some(PathBuf::from("rebound.yaml")));
        assert!(matches!(cli.command, Commands::Config));
    }
}
