//! Bulk cache synchronization.
//!
//! A run materializes every tile of a [`TileGrid`] into a [`TaskQueue`] and
//! starts a fixed pool of worker tasks. Each worker claims one task at a
//! time until the queue is drained:
//!
//! ```text
//! claim ─► cache.contains? ── yes ─► Skipped
//!                │
//!                no
//!                ▼
//!          fetch (timeout) ── err ─► Failed
//!                │
//!                ▼
//!          cache.set ──────── err ─► Failed
//!                │
//!                ▼
//!           Downloaded
//! ```
//!
//! Failed tiles are not retried within a run. Running the engine again is
//! the retry: satisfied entries are skipped, so repeated runs only ever add
//! to the cache.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::queue::{SyncCounters, TaskQueue};
use super::types::{
    DownloadOutcome, DownloadTask, SyncConfig, SyncProgressCallback, SyncReport,
};
use crate::cache::{CacheKey, TileCache};
use crate::coord::TileGrid;
use crate::provider::AsyncProvider;

/// Populates a tile cache from a remote provider under bounded concurrency.
pub struct SyncEngine<P: AsyncProvider> {
    provider: Arc<P>,
    cache: Arc<dyn TileCache>,
    config: SyncConfig,
}

impl<P: AsyncProvider + 'static> SyncEngine<P> {
    pub fn new(provider: Arc<P>, cache: Arc<dyn TileCache>, config: SyncConfig) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs to completion without progress reporting or cancellation.
    pub async fn run(&self, grid: &TileGrid) -> SyncReport {
        self.run_with_progress(grid, None, CancellationToken::new())
            .await
    }

    /// Runs over `grid`, reporting each outcome to `on_progress`.
    ///
    /// Cancelling `cancel` stops workers from claiming further tasks; tasks
    /// already in flight finish normally. The report is produced only after
    /// every worker has exited.
    pub async fn run_with_progress(
        &self,
        grid: &TileGrid,
        on_progress: Option<SyncProgressCallback>,
        cancel: CancellationToken,
    ) -> SyncReport {
        let start = Instant::now();
        let queue: TaskQueue = grid.iter().map(DownloadTask::new).collect();
        let total = queue.remaining() as u64;
        let worker_count = self.config.concurrency.min(queue.remaining()).max(1);

        info!(
            provider = self.provider.name(),
            cache = self.cache.name(),
            total,
            workers = worker_count,
            min_zoom = *grid.zooms().start(),
            max_zoom = *grid.zooms().end(),
            "Starting sync run"
        );

        let shared = Arc::new(Worker {
            provider: Arc::clone(&self.provider),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
            queue,
            counters: SyncCounters::new(),
            total,
            on_progress,
            report_lock: Mutex::new(()),
            cancel,
        });

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let worker = Arc::clone(&shared);
            workers.spawn(async move { worker.run(id).await });
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Sync worker terminated abnormally");
            }
        }

        let report = SyncReport {
            total,
            downloaded: shared.counters.downloaded(),
            skipped: shared.counters.skipped(),
            failed: shared.counters.failed(),
            elapsed: start.elapsed(),
            cancelled: !shared.queue.is_empty(),
        };

        info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Sync run finished"
        );
        report
    }
}

/// State shared by the workers of one run.
struct Worker<P: AsyncProvider> {
    provider: Arc<P>,
    cache: Arc<dyn TileCache>,
    config: SyncConfig,
    queue: TaskQueue,
    counters: SyncCounters,
    total: u64,
    on_progress: Option<SyncProgressCallback>,
    /// Serializes snapshot + callback so `completed` never goes backwards.
    report_lock: Mutex<()>,
    cancel: CancellationToken,
}

impl<P: AsyncProvider> Worker<P> {
    async fn run(&self, id: usize) {
        let mut handled = 0u64;
        while !self.cancel.is_cancelled() {
            let Some(task) = self.queue.claim() else {
                break;
            };
            let outcome = self.process(task).await;
            self.counters.record(&outcome);
            handled += 1;

            if let Some(callback) = &self.on_progress {
                let _ordered = self.report_lock.lock();
                callback(self.counters.snapshot(self.total));
            }
        }
        debug!(worker = id, handled, "Sync worker exiting");
    }

    async fn process(&self, task: DownloadTask) -> DownloadOutcome {
        let tile = task.tile;
        let key = CacheKey::esri(tile);

        match self.cache.contains(&key).await {
            Ok(true) => {
                debug!(tile = %tile, "Tile already cached");
                return DownloadOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(tile = %tile, error = %e, "Cache lookup failed, fetching anyway");
            }
        }

        let fetch = self.provider.download_tile(&tile);
        let data = match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                warn!(tile = %tile, error = %e, timeout = e.is_timeout(), "Tile fetch failed");
                return DownloadOutcome::Failed(e.to_string());
            }
            Err(_) => {
                let reason = format!(
                    "timed out after {}ms",
                    self.config.fetch_timeout.as_millis()
                );
                warn!(tile = %tile, reason = %reason, "Tile fetch failed");
                return DownloadOutcome::Failed(reason);
            }
        };

        let bytes = data.len();
        match self.cache.set(&key, data).await {
            Ok(()) => {
                debug!(tile = %tile, bytes, "Tile downloaded");
                DownloadOutcome::Downloaded
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "Tile write failed");
                DownloadOutcome::Failed(e.to_string())
            }
        }
    }
}
