//! User configuration.
//!
//! Loaded from `~/.orthocache/config.ini` (or an explicit path). A missing
//! file means defaults; a present file overlays the defaults key by key.
//!
//! ```ini
//! [region]
//! min_lat = 35.78
//! max_lat = 36.10
//! min_lon = 14.15
//! max_lon = 14.65
//!
//! [sync]
//! min_zoom = 12
//! max_zoom = 19
//! concurrency = 20
//! timeout = 8
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_CACHE_DIR_NAME, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_SERVER_PORT,
    DEFAULT_SYNC_TIMEOUT_SECS, DEFAULT_WMS_TIMEOUT_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, ConfigFile, ServerSettings, SyncSettings};
