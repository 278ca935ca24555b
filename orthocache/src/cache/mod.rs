//! Tile cache storage.
//!
//! A [`TileCache`] maps a [`CacheKey`] (imagery source plus tile
//! coordinate) to raw image bytes. The cache is append-only: this crate
//! never evicts or deletes entries, and retention is left to the operator.
//!
//! - [`DiskTileCache`]: one file per tile under a root directory
//! - [`MemoryTileCache`]: in-process map with the same semantics

mod disk;
mod key;
mod memory;
mod traits;

pub use disk::{CacheStats, DiskTileCache};
pub use key::{CacheKey, ESRI_SOURCE};
pub use memory::MemoryTileCache;
pub use traits::{BoxFuture, CacheError, TileCache};
