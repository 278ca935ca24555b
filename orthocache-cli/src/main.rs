//! OrthoCache CLI - Command-line interface
//!
//! Keeps an offline tile cache complete and serves it alongside historical
//! imagery overlays.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::grid::GridArgs;
use commands::serve::ServeArgs;
use commands::sync::SyncArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "orthocache")]
#[command(version = orthocache::VERSION)]
#[command(about = "Offline map tile cache and hybrid tile server", long_about = None)]
struct Cli {
    /// Config file (default: ~/.orthocache/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download every missing tile in the configured region
    Sync(SyncArgs),

    /// Serve cached tiles and historical overlays over HTTP
    Serve(ServeArgs),

    /// Show the tile grid for the configured region
    Grid(GridArgs),

    /// Show or initialize the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Sync(args) => commands::sync::run(args, config_path),
        Commands::Serve(args) => commands::serve::run(args, config_path),
        Commands::Grid(args) => commands::grid::run(args, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_without_arguments() {
        let cli = Cli::try_parse_from(["orthocache", "sync"]).unwrap();
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.concurrency.is_none());
                assert!(!args.no_progress);
            }
            other => panic!("expected sync, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_overrides() {
        let cli = Cli::try_parse_from([
            "orthocache",
            "sync",
            "--concurrency",
            "8",
            "--min-zoom",
            "14",
            "--max-zoom",
            "16",
            "--no-progress",
            "--config",
            "/tmp/custom.ini",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.ini")));
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.concurrency, Some(8));
                assert_eq!(args.min_zoom, Some(14));
                assert_eq!(args.max_zoom, Some(16));
                assert!(args.no_progress);
            }
            other => panic!("expected sync, got {:?}", other),
        }
    }

    #[test]
    fn test_serve_bind() {
        let cli = Cli::try_parse_from(["orthocache", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            }
            other => panic!("expected serve, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["orthocache", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn test_config_defaults_to_show() {
        let cli = Cli::try_parse_from(["orthocache", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { action: None }));

        let cli = Cli::try_parse_from(["orthocache", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: Some(ConfigCommands::Init { force: true })
            }
        ));
    }
}
