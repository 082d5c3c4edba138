// src/config/mod.rs
//! Configuration management for the terminal
//!
//! Settings are read from a TOML file; anything not present falls back
//! to defaults that target the public Strayacoin explorer and the
//! TradeOgre ticker.

/// Core configuration implementation
///
/// Contains the [`Config`] struct and its explorer/market sections.
pub mod config;

// Re-export key items for easy access
pub use config::{Config, ExplorerConfig, MarketConfig};

use crate::utils::error::TerminalError;
use std::path::PathBuf;

/// Loads terminal configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the configuration file (anything convertible to PathBuf)
///
/// # Returns
/// * `Ok(Config)` - Loaded configuration, or defaults if the file is absent
/// * `Err(TerminalError)` - If the file couldn't be read, parsed or validated
pub fn load(path: impl Into<PathBuf>) -> Result<Config, TerminalError> {
    Config::load(path)
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
