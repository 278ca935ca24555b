//! Default values for every configuration setting.

use std::net::{Ipv4Addr, SocketAddr};

use super::file::config_directory;
use super::settings::*;
use crate::coord::GeoBoundingBox;
use crate::sync::DEFAULT_CONCURRENCY;

/// Lowest zoom level synced by default.
pub const DEFAULT_MIN_ZOOM: u8 = 12;

/// Highest zoom level synced by default.
pub const DEFAULT_MAX_ZOOM: u8 = 19;

/// Per-tile fetch timeout in seconds.
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 8;

/// Upstream WMS timeout in seconds.
pub const DEFAULT_WMS_TIMEOUT_SECS: u64 = 8;

/// Default listen port for the tile server.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Name of the cache directory inside the config directory.
pub const DEFAULT_CACHE_DIR_NAME: &str = "tile_cache";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            region: GeoBoundingBox::malta(),
            sync: SyncSettings::default(),
            cache: CacheSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_SYNC_TIMEOUT_SECS,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join(DEFAULT_CACHE_DIR_NAME),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_SERVER_PORT)),
            wms_timeout: DEFAULT_WMS_TIMEOUT_SECS,
        }
    }
}
