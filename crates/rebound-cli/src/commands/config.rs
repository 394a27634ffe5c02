//! Configuration command

use std::path::Path;

use rebound_core::config::ResilienceConfig;

use crate::console::CliConsole;

/// Print the effective configuration
pub fn show(config: &ResilienceConfig, source: Option<&Path>) -> anyhow::Result<()> {
    let console = CliConsole::new();

    match source {
        Some(path) if path.exists() => {
            console.info(&format!("Loaded configuration from: {}", path.display()))
        }
        Some(path) => console.warn(&format!(
            "Configuration file not found: {}, using defaults",
            path.display()
        )),
        None => console.info("Using default configuration"),
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
