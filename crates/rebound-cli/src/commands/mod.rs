//! CLI commands

pub mod classify;
pub mod config;
pub mod simulate;
