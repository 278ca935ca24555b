//! Sync run configuration, outcomes and reports.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::coord::TileCoord;
use crate::provider::DEFAULT_TIMEOUT;

/// Default number of concurrent download workers.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Tuning for one sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Number of workers, fixed for the whole run. Never below 1.
    pub concurrency: usize,
    /// Upper bound on one tile fetch, body included.
    pub fetch_timeout: Duration,
}

impl SyncConfig {
    pub fn new(concurrency: usize, fetch_timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            fetch_timeout,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT)
    }
}

/// One unit of work: bring this tile into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownloadTask {
    pub tile: TileCoord,
}

impl DownloadTask {
    pub fn new(tile: TileCoord) -> Self {
        Self { tile }
    }
}

/// What happened to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched from the origin and written to the cache.
    Downloaded,
    /// Already satisfied in the cache; no request was made.
    Skipped,
    /// Fetch or write failed. The tile stays absent until the next run.
    Failed(String),
}

/// Snapshot of a run in progress, passed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncProgress {
    pub completed: u64,
    pub total: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Callback invoked after every recorded outcome.
///
/// Called from worker tasks; keep it cheap.
pub type SyncProgressCallback = Arc<dyn Fn(SyncProgress) + Send + Sync>;

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Tiles in the grid.
    pub total: u64,
    pub downloaded: u64,
    /// Tiles already present before the run touched them.
    pub skipped: u64,
    pub failed: u64,
    pub elapsed: Duration,
    /// The run stopped claiming work before the grid was exhausted.
    pub cancelled: bool,
}

impl SyncReport {
    /// Tasks that reached an outcome.
    pub fn completed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed
    }

    /// True when every tile in the grid is now satisfied.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failed == 0 && self.completed() == self.total
    }

    /// Downloads per second over the whole run.
    pub fn download_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.downloaded as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} existing, {} downloaded, {} failed ({} of {} tiles in {:.1}s)",
            self.skipped,
            self.downloaded,
            self.failed,
            self.completed(),
            self.total,
            self.elapsed.as_secs_f64()
        )
    }
}
