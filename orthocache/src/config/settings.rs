//! Settings structs, one per `[section]` of the INI file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::coord::{CoordError, GeoBoundingBox, TileGrid};
use crate::sync::SyncConfig;

/// Complete configuration loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Operational area
    pub region: GeoBoundingBox,
    pub sync: SyncSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Concurrent download workers
    pub concurrency: usize,
    /// Per-tile fetch timeout in seconds
    pub timeout: u64,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Root directory holding one file per tile
    pub directory: PathBuf,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// Upstream WMS timeout in seconds
    pub wms_timeout: u64,
}

impl ConfigFile {
    /// Tile grid covering the region over the configured zoom range.
    pub fn grid(&self) -> Result<TileGrid, CoordError> {
        TileGrid::new(self.region, self.sync.min_zoom, self.sync.max_zoom)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(self.sync.concurrency, Duration::from_secs(self.sync.timeout))
    }

    pub fn wms_timeout(&self) -> Duration {
        Duration::from_secs(self.server.wms_timeout)
    }
}
