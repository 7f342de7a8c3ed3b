//! Command-line argument parsing for the Skywatch viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Skywatch command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "skywatch", about = "Earth and star field viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Directory holding the star catalog, constellation, and texture files.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Apparent magnitude cutoff for loading stars.
    #[arg(long)]
    pub magnitude_limit: Option<f64>,

    /// Start with constellation lines hidden.
    #[arg(long)]
    pub hide_constellations: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref dir) = args.data_dir {
            self.data.data_dir = dir.clone();
        }
        if let Some(limit) = args.magnitude_limit {
            self.sky.magnitude_limit = limit;
        }
        if args.hide_constellations {
            self.sky.show_constellations = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            width: None,
            height: None,
            data_dir: None,
            magnitude_limit: None,
            hide_constellations: false,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            data_dir: Some(PathBuf::from("/srv/skydata")),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.data.data_dir, PathBuf::from("/srv/skydata"));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert!((config.sky.magnitude_limit - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hide_constellations_flag() {
        let mut config = Config::default();
        assert!(config.sky.show_constellations);
        let args = CliArgs {
            hide_constellations: true,
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert!(!config.sky.show_constellations);
    }

    #[test]
    fn test_no_overrides_is_identity() {
        let mut config = Config::default();
        let before = config.clone();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, before);
    }
}
