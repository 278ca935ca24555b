//! In-memory tile cache.
//!
//! A `DashMap`-backed [`TileCache`] with the same empty-entry rules as the
//! disk cache. Useful for embedding the router without a cache directory,
//! and as a fast stand-in for the disk cache in tests.

use dashmap::DashMap;

use super::key::CacheKey;
use super::traits::{BoxFuture, CacheError, TileCache};

/// Tile cache held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryTileCache {
    entries: DashMap<CacheKey, Vec<u8>>,
}

impl MemoryTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes without the empty-payload check.
    ///
    /// Lets callers model a truncated entry left by an interrupted write.
    pub fn insert_raw(&self, key: CacheKey, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Number of stored entries, including empty ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TileCache for MemoryTileCache {
    fn contains<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, Result<bool, CacheError>> {
        let present = self
            .entries
            .get(key)
            .map(|entry| !entry.is_empty())
            .unwrap_or(false);
        Box::pin(async move { Ok(present) })
    }

    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, CacheError>> {
        let value = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.value().clone());
        Box::pin(async move { Ok(value) })
    }

    fn set<'a>(
        &'a self,
        key: &'a CacheKey,
        value: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), CacheError>> {
        Box::pin(async move {
            if value.is_empty() {
                return Err(CacheError::EmptyPayload(key.file_name()));
            }
            self.entries.insert(key.clone(), value);
            Ok(())
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
