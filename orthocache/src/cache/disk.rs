//! Disk-backed tile cache.
//!
//! One file per entry, flat under the cache root:
//!
//! ```text
//! tile_cache/
//! ├── esri_12_2208_1607.jpg
//! ├── esri_12_2208_1608.jpg
//! └── ...
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never sees a partially written tile and a crash mid-write leaves
//! at worst a stray temporary file. Blocking file operations run on tokio's
//! blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, trace, warn};

use super::key::CacheKey;
use super::traits::{BoxFuture, CacheError, TileCache};

/// Suffix for in-progress writes; never matches a key's file name.
const TEMP_SUFFIX: &str = ".part";

/// Summary of what is on disk under a cache root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Non-empty tile files.
    pub entry_count: u64,
    /// Total bytes across non-empty tile files.
    pub total_bytes: u64,
    /// Zero-length tile files (treated as absent).
    pub empty_entries: u64,
}

/// Tile cache storing one file per key under a root directory.
#[derive(Debug)]
pub struct DiskTileCache {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl DiskTileCache {
    /// Opens a cache rooted at `root`, creating the directory if needed.
    ///
    /// Temporary files left behind by writers that never reached the rename
    /// are removed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let swept = sweep_temp_files(&root)?;
        if swept > 0 {
            info!(root = %root.display(), swept, "Removed stale temporary cache files");
        }
        debug!(root = %root.display(), "Opened disk tile cache");
        Ok(Self {
            root,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the entry for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn temp_path_for(&self, key: &CacheKey) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}{}",
            key.file_name(),
            std::process::id(),
            n,
            TEMP_SUFFIX
        ))
    }

    /// Walks the cache root and summarizes tile files.
    pub async fn scan(&self) -> Result<CacheStats, CacheError> {
        let root = self.root.clone();
        run_blocking(move || scan_dir(&root)).await
    }
}

impl TileCache for DiskTileCache {
    fn contains<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, Result<bool, CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            run_blocking(move || match std::fs::metadata(&path) {
                Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(CacheError::Io(e)),
            })
            .await
        })
    }

    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            run_blocking(move || match std::fs::read(&path) {
                Ok(data) if data.is_empty() => {
                    trace!(path = %path.display(), "Empty cache entry treated as miss");
                    Ok(None)
                }
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CacheError::Io(e)),
            })
            .await
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a CacheKey,
        value: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), CacheError>> {
        let path = self.path_for(key);
        let temp = self.temp_path_for(key);
        Box::pin(async move {
            if value.is_empty() {
                return Err(CacheError::EmptyPayload(key.file_name()));
            }
            run_blocking(move || {
                if let Err(e) = std::fs::write(&temp, &value) {
                    let _ = std::fs::remove_file(&temp);
                    return Err(CacheError::Io(e));
                }
                if let Err(e) = std::fs::rename(&temp, &path) {
                    let _ = std::fs::remove_file(&temp);
                    return Err(CacheError::Io(e));
                }
                Ok(())
            })
            .await
        })
    }

    fn name(&self) -> &str {
        "disk"
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, CacheError>
where
    F: FnOnce() -> Result<T, CacheError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::Task(e.to_string()))?
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

fn sweep_temp_files(root: &Path) -> Result<u64, CacheError> {
    let mut swept = 0;
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        if !is_temp_file(&name.to_string_lossy()) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => swept += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %entry.path().display(), error = %e, "Failed to remove temporary file"),
        }
    }
    Ok(swept)
}

fn scan_dir(root: &Path) -> Result<CacheStats, CacheError> {
    let mut stats = CacheStats::default();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || !name.ends_with(".jpg") {
            continue;
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        if meta.len() == 0 {
            stats.empty_entries += 1;
        } else {
            stats.entry_count += 1;
            stats.total_bytes += meta.len();
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;
    use tempfile::TempDir;

    fn key(col: u32) -> CacheKey {
        CacheKey::esri(TileCoord {
            zoom: 12,
            col,
            row: 1607,
        })
    }

    fn open_temp() -> (TempDir, DiskTileCache) {
        let dir = TempDir::new().unwrap();
        let cache = DiskTileCache::open(dir.path().join("tile_cache")).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_open_creates_root() {
        let (dir, cache) = open_temp();
        assert!(cache.root().is_dir());
        assert_eq!(cache.root(), dir.path().join("tile_cache"));
    }

    #[test]
    fn test_path_uses_flat_layout() {
        let (_dir, cache) = open_temp();
        let path = cache.path_for(&key(2208));
        assert_eq!(path, cache.root().join("esri_12_2208_1607.jpg"));
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_dir, cache) = open_temp();
        cache.set(&key(1), vec![0xFF, 0xD8, 0xFF]).await.unwrap();

        assert!(cache.contains(&key(1)).await.unwrap());
        assert_eq!(cache.get(&key(1)).await.unwrap(), Some(vec![0xFF, 0xD8, 0xFF]));
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let (_dir, cache) = open_temp();
        assert!(!cache.contains(&key(9)).await.unwrap());
        assert_eq!(cache.get(&key(9)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_length_file_is_absent() {
        let (_dir, cache) = open_temp();
        std::fs::write(cache.path_for(&key(3)), b"").unwrap();

        assert!(!cache.contains(&key(3)).await.unwrap());
        assert_eq!(cache.get(&key(3)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_zero_length_file() {
        let (_dir, cache) = open_temp();
        std::fs::write(cache.path_for(&key(4)), b"").unwrap();

        cache.set(&key(4), vec![7; 16]).await.unwrap();
        assert_eq!(std::fs::read(cache.path_for(&key(4))).unwrap(), vec![7; 16]);
    }

    #[tokio::test]
    async fn test_set_rejects_empty_payload() {
        let (_dir, cache) = open_temp();
        let result = cache.set(&key(5), Vec::new()).await;
        assert!(matches!(result, Err(CacheError::EmptyPayload(_))));
        assert!(!cache.path_for(&key(5)).exists());
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_files() {
        let (_dir, cache) = open_temp();
        for col in 0..5 {
            cache.set(&key(col), vec![1, 2, 3]).await.unwrap();
        }
        let names: Vec<_> = std::fs::read_dir(cache.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| !n.ends_with(TEMP_SUFFIX)));
    }

    #[test]
    fn test_open_removes_stale_temp_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tile_cache");
        std::fs::create_dir_all(&root).unwrap();
        let stale = root.join(format!(".esri_12_1_1607.jpg.4242.0{}", TEMP_SUFFIX));
        let tile = root.join("esri_12_2_1607.jpg");
        std::fs::write(&stale, b"partial").unwrap();
        std::fs::write(&tile, b"jpeg").unwrap();

        let cache = DiskTileCache::open(&root).unwrap();

        assert!(!stale.exists());
        assert_eq!(std::fs::read(cache.path_for(&key(2))).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_concurrent_writes_distinct_keys() {
        let (_dir, cache) = open_temp();
        let cache = std::sync::Arc::new(cache);

        let handles: Vec<_> = (0..32)
            .map(|col| {
                let cache = std::sync::Arc::clone(&cache);
                tokio::spawn(async move { cache.set(&key(col), vec![col as u8 + 1; 64]).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for col in 0..32 {
            assert_eq!(
                cache.get(&key(col)).await.unwrap(),
                Some(vec![col as u8 + 1; 64])
            );
        }
    }

    #[tokio::test]
    async fn test_scan_counts_entries() {
        let (_dir, cache) = open_temp();
        cache.set(&key(1), vec![1; 10]).await.unwrap();
        cache.set(&key(2), vec![1; 20]).await.unwrap();
        std::fs::write(cache.path_for(&key(3)), b"").unwrap();
        std::fs::write(cache.root().join("notes.txt"), b"ignored").unwrap();

        let stats = cache.scan().await.unwrap();
        assert_eq!(
            stats,
            CacheStats {
                entry_count: 2,
                total_bytes: 30,
                empty_entries: 1,
            }
        );
    }
}
