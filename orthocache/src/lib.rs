//! OrthoCache - offline map imagery cache and hybrid tile server
//!
//! This library keeps a disk cache of Web Mercator raster tiles for a fixed
//! region complete, and serves tiles either strictly from that cache or, for
//! historical imagery, by proxying to remote WMS authorities.
//!
//! # High-Level Flow
//!
//! ```ignore
//! use std::sync::Arc;
//! use orthocache::cache::{DiskTileCache, TileCache};
//! use orthocache::config::ConfigFile;
//! use orthocache::provider::{AsyncArcGisProvider, AsyncReqwestClient};
//! use orthocache::sync::SyncEngine;
//!
//! let config = ConfigFile::load()?;
//! let cache: Arc<dyn TileCache> = Arc::new(DiskTileCache::open(&config.cache.directory)?);
//! let provider = Arc::new(AsyncArcGisProvider::new(AsyncReqwestClient::new()?));
//!
//! let engine = SyncEngine::new(provider, cache, config.sync_config());
//! let report = engine.run(&config.grid()?).await;
//! println!("{}", report);
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod logging;
pub mod provider;
pub mod router;
pub mod server;
pub mod sync;
pub mod wms;

/// Version of the OrthoCache library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
