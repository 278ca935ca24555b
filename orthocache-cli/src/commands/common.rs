//! Setup shared across CLI commands.

use std::path::Path;

use orthocache::config::{config_directory, ConfigFile};
use orthocache::logging::{init_logging, LoggingGuard, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;

/// Loads the config from `path`, or from `~/.orthocache/config.ini`.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Starts logging to `~/.orthocache/logs/orthocache.log` and stdout.
///
/// With `quiet`, stdout only carries warnings so a progress bar can own
/// the terminal.
pub fn start_logging(quiet: bool) -> Result<LoggingGuard, CliError> {
    let log_dir = config_directory().join(DEFAULT_LOG_DIR);
    init_logging(&log_dir, DEFAULT_LOG_FILE, quiet)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// Builds the multi-threaded runtime the commands run on.
pub fn build_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("orthocache")
        .build()
        .map_err(CliError::Runtime)
}

/// Cancels `token` on the first Ctrl+C.
///
/// Must be called from within the runtime.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, finishing in-flight work");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "Unable to listen for Ctrl+C"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[sync]\nconcurrency = 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.sync.concurrency, 3);
    }

    #[test]
    fn test_load_config_reports_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[sync]\nmax_zoom = huge\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(CliError::Config(_))));
    }
}
