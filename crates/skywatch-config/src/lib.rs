//! Configuration for the Skywatch viewer: RON persistence plus CLI overrides.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DataConfig, DebugConfig, SkyConfig, WindowConfig};
pub use error::ConfigError;

use std::path::PathBuf;

/// Resolve the platform config directory for Skywatch.
///
/// Falls back to `./config` when the platform provides no config location.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("skywatch"))
        .unwrap_or_else(|| PathBuf::from("config"))
}
