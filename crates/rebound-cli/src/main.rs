//! Rebound CLI
//!
//! Inspect how the resilience layer treats errors and watch a simulated
//! flaky dependency go through retries and circuit breaking.
//!
//! ```bash
//! rebound classify rate_limited
//! rebound simulate --failures 4 --calls 6 --fallback cached
//! rebound --config rebound.toml config
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;
use rebound_core::config::ResilienceConfig;

use crate::args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ResilienceConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose);

    router::route(cli, config).await
}
