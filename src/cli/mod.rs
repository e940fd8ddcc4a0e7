//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Almanac using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Almanac - weather station day-file exporter
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
#[command(author = "Almanac Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "almanac.toml", env = "ALMANAC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ALMANAC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every complete day after the watermark
    Export(commands::export::ExportArgs),

    /// Show the watermark and the pending day range
    Status(commands::status::StatusArgs),

    /// Move the watermark to just before a given day
    ResetState(commands::reset_state::ResetStateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command needs a loaded configuration
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["almanac", "export"]);
        assert_eq!(cli.config, "almanac.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from([
            "almanac", "export", "--stop", "20240314", "--force", "--dry-run",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.stop.unwrap().to_string(), "2024-03-14");
                assert!(args.force);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_stop_day() {
        let result = Cli::try_parse_from(["almanac", "export", "--stop", "2024-13-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["almanac", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["almanac", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_reset_state() {
        let cli = Cli::parse_from(["almanac", "reset-state", "20240101", "--force"]);
        match cli.command {
            Commands::ResetState(args) => {
                assert_eq!(args.day.unwrap().compact(), "20240101");
                assert!(args.force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_reset_state_without_day() {
        let cli = Cli::parse_from(["almanac", "reset-state"]);
        assert!(matches!(
            cli.command,
            Commands::ResetState(ref args) if args.day.is_none() && !args.force
        ));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["almanac", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["almanac", "init"]);
        assert!(!cli.command.needs_config());
    }
}
