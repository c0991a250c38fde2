//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Leadex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Leadex - export valid leads from Redis to CSV
#[derive(Parser, Debug)]
#[command(name = "leadex")]
#[command(version, about, long_about = None)]
#[command(author = "Leadex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "leadex.toml", env = "LEADEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEADEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export valid, not yet exported leads to CSV and mark them exported
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["leadex", "export"]);
        assert_eq!(cli.config, "leadex.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from([
            "leadex",
            "export",
            "--output",
            "out.csv",
            "--no-enrichment",
            "--dry-run",
            "--yes",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.output.as_deref(), Some("out.csv"));
                assert!(args.no_enrichment);
                assert!(args.dry_run);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["leadex", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["leadex", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["leadex", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["leadex", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.output, "leadex.toml");
                assert!(args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
