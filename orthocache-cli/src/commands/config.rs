//! `orthocache config`: inspect or initialize the configuration file.

use std::path::Path;

use clap::Subcommand;
use orthocache::config::{config_file_path, ConfigFile};

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration (the default)
    Show,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: Option<ConfigCommands>, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(path))?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    println!("Config: {}", source);
    println!();
    println!("[region]");
    println!("  lat:         {} .. {}", config.region.min_lat, config.region.max_lat);
    println!("  lon:         {} .. {}", config.region.min_lon, config.region.max_lon);
    println!("[sync]");
    println!("  zoom:        {} .. {}", config.sync.min_zoom, config.sync.max_zoom);
    println!("  concurrency: {}", config.sync.concurrency);
    println!("  timeout:     {}s", config.sync.timeout);
    println!("[cache]");
    println!("  directory:   {}", config.cache.directory.display());
    println!("[server]");
    println!("  bind:        {}", config.server.bind);
    println!("  wms_timeout: {}s", config.server.wms_timeout);
    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    ConfigFile::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
