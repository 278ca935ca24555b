//! Bulk synchronization of the local raster cache.
//!
//! [`SyncEngine`] walks a [`TileGrid`](crate::coord::TileGrid), skips tiles
//! already satisfied in the cache and downloads the rest through a fixed
//! pool of workers. A run never removes or rewrites a valid entry, so it is
//! safe to repeat as often as needed; there is no journal beyond the cache
//! files themselves.

mod engine;
mod queue;
mod types;

pub use engine::SyncEngine;
pub use queue::{SyncCounters, TaskQueue};
pub use types::{
    DownloadOutcome, DownloadTask, SyncConfig, SyncProgress, SyncProgressCallback, SyncReport,
    DEFAULT_CONCURRENCY,
};
