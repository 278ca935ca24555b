//! Coordinate type definitions

use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels accepted anywhere in the pyramid.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Tile coordinates in the Web Mercator / slippy-map pyramid.
///
/// Invariant: `col` and `row` are both below `2^zoom`. Values built through
/// [`TileCoord::new`] are checked; the grid enumerator only produces valid
/// coordinates for valid bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
}

impl TileCoord {
    /// Creates a tile coordinate, checking it lies inside the `2^zoom` grid.
    pub fn new(zoom: u8, col: u32, row: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let size = tiles_per_side(zoom);
        if u64::from(col) >= size || u64::from(row) >= size {
            return Err(CoordError::OutOfRange { zoom, col, row });
        }
        Ok(Self { zoom, col, row })
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Number of tiles along one side of the grid at `zoom`.
#[inline]
pub fn tiles_per_side(zoom: u8) -> u64 {
    1u64 << zoom
}

/// A rectangular geographic region in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBoundingBox {
    /// Creates a bounding box, rejecting inverted or out-of-projection ranges.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, CoordError> {
        for lat in [min_lat, max_lat] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        for lon in [min_lon, max_lon] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(CoordError::InvalidLongitude(lon));
            }
        }
        if min_lat > max_lat || min_lon > max_lon {
            return Err(CoordError::InvertedBounds);
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// The Maltese islands, the region this cache was first built for.
    pub const fn malta() -> Self {
        Self {
            min_lat: 35.78,
            max_lat: 36.10,
            min_lon: 14.15,
            max_lon: 14.65,
        }
    }

    /// Returns true if the point lies inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

impl Default for GeoBoundingBox {
    fn default() -> Self {
        Self::malta()
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    #[error("Invalid latitude: {0} (must be between {} and {})", MIN_LAT, MAX_LAT)]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    #[error("Invalid longitude: {0} (must be between {} and {})", MIN_LON, MAX_LON)]
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    #[error("Invalid zoom level: {0} (must be between {} and {})", MIN_ZOOM, MAX_ZOOM)]
    InvalidZoom(u8),
    /// Minimum zoom above maximum zoom
    #[error("Invalid zoom range: {min}..={max}")]
    InvalidZoomRange { min: u8, max: u8 },
    /// Column or row outside the 2^zoom grid
    #[error("Tile {zoom}/{col}/{row} is outside the grid at zoom {zoom}")]
    OutOfRange { zoom: u8, col: u32, row: u32 },
    /// Bounding box minimum exceeds maximum
    #[error("Bounding box minimum exceeds maximum")]
    InvertedBounds,
}
