//! Core traits for the tile cache.
//!
//! The `TileCache` trait is a minimal key-value interface over raw image
//! bytes. Keys are [`CacheKey`] values, which render to deterministic file
//! names, so any backend stores the same tile under the same name.
//!
//! # Satisfied entries
//!
//! An entry counts as present only when it holds at least one byte. A
//! zero-length entry is what an interrupted or failed write leaves
//! behind, so every backend reports it as absent from
//! [`TileCache::contains`] and [`TileCache::get`]. The next sync run then
//! downloads it again.
//!
//! # Dyn Compatibility
//!
//! This trait uses `Pin<Box<dyn Future>>` for async methods so it can be
//! used as `Arc<dyn TileCache>` by the sync engine and the router alike.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::key::CacheKey;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refused to store an empty payload, which would read back as absent.
    #[error("Refusing to store empty payload for {0}")]
    EmptyPayload(String),

    /// Blocking I/O task panicked or was cancelled.
    #[error("Cache I/O task failed: {0}")]
    Task(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key-value storage for tile images.
///
/// # Thread Safety
///
/// Implementations must tolerate concurrent reads and concurrent writes to
/// distinct keys. Concurrent writes to the same key are not expected: one
/// sync worker owns one coordinate at a time.
pub trait TileCache: Send + Sync {
    /// Returns true if the key holds a non-empty entry.
    fn contains<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, Result<bool, CacheError>>;

    /// Retrieve an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key holds a non-empty entry
    /// - `Ok(None)` if the key is missing or its entry is empty
    /// - `Err(_)` if an error occurs
    fn get<'a>(&'a self, key: &'a CacheKey)
        -> BoxFuture<'a, Result<Option<Vec<u8>>, CacheError>>;

    /// Store an entry, replacing any previous value.
    ///
    /// Empty payloads are rejected with [`CacheError::EmptyPayload`].
    fn set<'a>(&'a self, key: &'a CacheKey, value: Vec<u8>)
        -> BoxFuture<'a, Result<(), CacheError>>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::EmptyPayload("esri_12_1_2.jpg".to_string());
        assert!(err.to_string().contains("esri_12_1_2.jpg"));
    }

    #[test]
    fn test_cache_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::Io(_)));
    }
}
