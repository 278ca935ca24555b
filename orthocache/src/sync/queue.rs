//! Shared task source and outcome counters for sync workers.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::types::{DownloadOutcome, DownloadTask, SyncProgress};

/// Claim-once queue of download tasks.
///
/// Workers take tasks from the back, so claim order is the reverse of
/// insertion. Every task is handed out exactly once.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<Vec<DownloadTask>>,
}

impl TaskQueue {
    pub fn new(tasks: Vec<DownloadTask>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    /// Takes one task, or `None` once the queue is drained.
    pub fn claim(&self) -> Option<DownloadTask> {
        self.tasks.lock().pop()
    }

    pub fn remaining(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl FromIterator<DownloadTask> for TaskQueue {
    fn from_iter<I: IntoIterator<Item = DownloadTask>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Atomic per-outcome counters shared by all workers of a run.
#[derive(Debug, Default)]
pub struct SyncCounters {
    downloaded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl SyncCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one outcome.
    pub fn record(&self, outcome: &DownloadOutcome) {
        let counter = match outcome {
            DownloadOutcome::Downloaded => &self.downloaded,
            DownloadOutcome::Skipped => &self.skipped,
            DownloadOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::SeqCst)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Current totals against `total` tasks.
    pub fn snapshot(&self, total: u64) -> SyncProgress {
        let downloaded = self.downloaded();
        let skipped = self.skipped();
        let failed = self.failed();
        SyncProgress {
            completed: downloaded + skipped + failed,
            total,
            downloaded,
            skipped,
            failed,
        }
    }
}
