//! Cache key derivation.

use std::fmt;

use crate::coord::TileCoord;

/// Source namespace for Esri World Imagery tiles, the only cached source.
pub const ESRI_SOURCE: &str = "esri";

/// Deterministic key for one tile of one imagery source.
///
/// Renders as `{source}_{zoom}_{col}_{row}.jpg`, the same flat file naming
/// existing caches already use, so a cache seeded by earlier tooling is read
/// as complete.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source: &'static str,
    tile: TileCoord,
}

impl CacheKey {
    pub fn new(source: &'static str, tile: TileCoord) -> Self {
        Self { source, tile }
    }

    /// Key for an Esri World Imagery tile.
    pub fn esri(tile: TileCoord) -> Self {
        Self::new(ESRI_SOURCE, tile)
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    /// File name of the entry inside the cache root.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.jpg",
            self.source, self.tile.zoom, self.tile.col, self.tile.row
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_column_before_row() {
        let key = CacheKey::esri(TileCoord {
            zoom: 13,
            col: 4424,
            row: 3219,
        });
        assert_eq!(key.file_name(), "esri_13_4424_3219.jpg");
    }

    #[test]
    fn test_same_tile_same_key() {
        let tile = TileCoord {
            zoom: 17,
            col: 70700,
            row: 51500,
        };
        assert_eq!(CacheKey::esri(tile), CacheKey::esri(tile));
        assert_eq!(CacheKey::esri(tile).to_string(), CacheKey::esri(tile).file_name());
    }

    #[test]
    fn test_source_namespaces_differ() {
        let tile = TileCoord {
            zoom: 12,
            col: 2208,
            row: 1607,
        };
        assert_ne!(
            CacheKey::new("other", tile).file_name(),
            CacheKey::esri(tile).file_name()
        );
    }
}
