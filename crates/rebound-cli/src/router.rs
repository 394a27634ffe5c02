//! Command routing

use rebound_core::config::ResilienceConfig;

use crate::args::{Cli, Commands};
use crate::commands::{classify, config, simulate};

/// Dispatch a parsed command line
pub async fn route(cli: Cli, resilience: ResilienceConfig) -> anyhow::Result<()> {
    tracing::debug!(
        command = ?cli.command,
        config = ?cli.config,
        failure_threshold = resilience.circuit_breaker.failure_threshold,
        max_attempts = resilience.retry.max_attempts,
        "Dispatching command"
    );

    match cli.command {
        Commands::Classify {
            code,
            message,
            retryable_codes,
            json,
        } => classify::execute(&code, message.as_deref(), retryable_codes, json),
        Commands::Simulate {
            failures,
            code,
            calls,
            service,
            fallback,
        } => {
            let args = simulate::SimulateArgs {
                failures,
                code,
                calls,
                service,
                fallback,
            };
            simulate::execute(&resilience, args).await
        }
        Commands::Config => config::show(&resilience, cli.config.as_deref()),
    }
}
