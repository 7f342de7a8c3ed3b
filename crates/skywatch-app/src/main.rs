//! The binary entry point for the Skywatch viewer.

mod scene;
mod window;

use clap::Parser;
use tracing::{error, warn};

use skywatch_config::{CliArgs, Config, default_config_dir};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            // A broken config file should not keep the viewer from starting.
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    skywatch_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.save(&config_dir) {
        warn!("Could not persist config: {e}");
    }

    if config.window.width == 0 || config.window.height == 0 {
        error!("Window dimensions must be non-zero");
        std::process::exit(1);
    }

    window::run(config);
}
