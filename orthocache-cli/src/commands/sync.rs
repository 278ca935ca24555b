//! `orthocache sync`: bring the local raster cache up to date.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use orthocache::cache::{DiskTileCache, TileCache};
use orthocache::config::ConfigFile;
use orthocache::provider::{AsyncArcGisProvider, AsyncReqwestClient};
use orthocache::sync::{SyncEngine, SyncProgress, SyncProgressCallback, SyncReport};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::{build_runtime, cancel_on_ctrl_c, load_config, start_logging};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Concurrent downloads (overrides [sync] concurrency)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Lowest zoom level to sync (overrides [sync] min_zoom)
    #[arg(long)]
    pub min_zoom: Option<u8>,

    /// Highest zoom level to sync (overrides [sync] max_zoom)
    #[arg(long)]
    pub max_zoom: Option<u8>,

    /// Disable the progress bar and log to stdout instead
    #[arg(long)]
    pub no_progress: bool,
}

impl SyncArgs {
    /// Applies command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut ConfigFile) {
        if let Some(concurrency) = self.concurrency {
            config.sync.concurrency = concurrency.max(1);
        }
        if let Some(min_zoom) = self.min_zoom {
            config.sync.min_zoom = min_zoom;
        }
        if let Some(max_zoom) = self.max_zoom {
            config.sync.max_zoom = max_zoom;
        }
    }
}

/// Runs one sync pass over the configured region.
///
/// Individual tile failures are reported, not fatal: the command still exits
/// successfully and the next run retries them.
pub fn run(args: SyncArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    let grid = config.grid().map_err(|e| CliError::Config(e.to_string()))?;

    let show_progress = !args.no_progress;
    let _logging = start_logging(show_progress)?;

    let cache: Arc<dyn TileCache> = Arc::new(DiskTileCache::open(&config.cache.directory)?);

    println!(
        "Syncing {} tiles (zoom {}-{}) into {}",
        grid.tile_count(),
        config.sync.min_zoom,
        config.sync.max_zoom,
        config.cache.directory.display()
    );

    let bar = show_progress.then(|| progress_bar(grid.tile_count()));
    let on_progress = bar.clone().map(|bar| -> SyncProgressCallback {
        Arc::new(move |progress: SyncProgress| update_bar(&bar, &progress))
    });

    let runtime = build_runtime()?;
    let report = runtime.block_on(async {
        let client = AsyncReqwestClient::with_timeout(Duration::from_secs(config.sync.timeout))
            .map_err(CliError::HttpClient)?;
        let provider = Arc::new(AsyncArcGisProvider::new(client));
        let engine = SyncEngine::new(provider, cache, config.sync_config());

        let cancel = CancellationToken::new();
        cancel_on_ctrl_c(cancel.clone());
        Ok::<_, CliError>(engine.run_with_progress(&grid, on_progress, cancel).await)
    })?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    print_report(&report);
    info!(report = %report, "Sync command complete");
    Ok(())
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn update_bar(bar: &ProgressBar, progress: &SyncProgress) {
    bar.set_position(progress.completed);
    bar.set_message(format!(
        "new {} / existing {} / failed {}",
        progress.downloaded, progress.skipped, progress.failed
    ));
}

fn print_report(report: &SyncReport) {
    println!();
    if report.cancelled {
        println!("Sync interrupted; run again to resume.");
    }
    println!("existing:   {}", report.skipped);
    println!("downloaded: {}", report.downloaded);
    println!("failed:     {}", report.failed);
    println!(
        "({} of {} tiles in {:.1}s, {:.1} downloads/s)",
        report.completed(),
        report.total,
        report.elapsed.as_secs_f64(),
        report.download_rate()
    );
    if report.failed > 0 {
        println!("Failed tiles stay absent and are retried on the next run.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SyncArgs {
        SyncArgs {
            concurrency: None,
            min_zoom: None,
            max_zoom: None,
            no_progress: false,
        }
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = ConfigFile::default();
        args().apply(&mut config);
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = ConfigFile::default();
        SyncArgs {
            concurrency: Some(4),
            min_zoom: Some(14),
            max_zoom: Some(15),
            ..args()
        }
        .apply(&mut config);

        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.sync.min_zoom, 14);
        assert_eq!(config.sync.max_zoom, 15);
        assert_eq!(config.grid().unwrap().tile_count(), 456 + 1739);
    }

    #[test]
    fn test_zero_concurrency_floored() {
        let mut config = ConfigFile::default();
        SyncArgs {
            concurrency: Some(0),
            ..args()
        }
        .apply(&mut config);
        assert_eq!(config.sync.concurrency, 1);
    }

    #[test]
    fn test_update_bar_tracks_completed() {
        let bar = ProgressBar::hidden();
        bar.set_length(10);
        update_bar(
            &bar,
            &SyncProgress {
                completed: 7,
                total: 10,
                downloaded: 5,
                skipped: 1,
                failed: 1,
            },
        );
        assert_eq!(bar.position(), 7);
        assert_eq!(bar.message(), "new 5 / existing 1 / failed 1");
    }
}
