//! Configuration management
//!
//! Sources are applied in order: built-in defaults, then a TOML/YAML/JSON
//! file, then `REBOUND_*` environment variables.

pub mod env_loader;
pub mod file_loader;
pub mod logging_config;
pub mod resilience_config;

pub use env_loader::apply_env_overrides;
pub use file_loader::load_from_file;
pub use logging_config::LoggingConfig;
pub use resilience_config::ResilienceConfig;
