//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, plus enumeration of every tile covering
//! a bounding box across a zoom range.
//!
//! # Domain
//!
//! [`lon_to_col`] and [`lat_to_row`] are total only for latitudes inside the
//! Web Mercator limits (about ±85.0511°). Outside that range the projection
//! produces NaN or infinity and the saturating float-to-int cast yields a
//! meaningless index. Callers supply validated bounding boxes
//! ([`GeoBoundingBox::new`]), so the raw functions do not check.

mod grid;
mod types;

pub use grid::{TileGrid, TileGridIter, ZoomRange};
pub use types::{
    tiles_per_side, CoordError, GeoBoundingBox, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts a longitude to the tile column containing it at `zoom`.
///
/// `column = floor((lon + 180) / 360 * 2^zoom)`
#[inline]
pub fn lon_to_col(lon: f64, zoom: u8) -> u32 {
    let n = tiles_per_side(zoom) as f64;
    ((lon + 180.0) / 360.0 * n).floor() as u32
}

/// Converts a latitude to the tile row containing it at `zoom`.
///
/// `row = floor((1 - ln(tan(φ) + sec(φ)) / π) / 2 * 2^zoom)`
#[inline]
pub fn lat_to_row(lat: f64, zoom: u8) -> u32 {
    let n = tiles_per_side(zoom) as f64;
    let lat_rad = lat * PI / 180.0;
    let merc = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();
    ((1.0 - merc / PI) / 2.0 * n).floor() as u32
}

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    // lon = 180 lands one past the last column
    let last = (tiles_per_side(zoom) - 1) as u32;
    Ok(TileCoord {
        zoom,
        col: lon_to_col(lon, zoom).min(last),
        row: lat_to_row(lat, zoom).min(last),
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = tiles_per_side(tile.zoom) as f64;

    let lon = tile.col as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

impl TileCoord {
    /// Geographic extent of this tile.
    pub fn bounds(&self) -> GeoBoundingBox {
        let (max_lat, min_lon) = tile_to_lat_lon(self);
        let (min_lat, max_lon) = tile_to_lat_lon(&TileCoord {
            zoom: self.zoom,
            col: self.col + 1,
            row: self.row + 1,
        });
        GeoBoundingBox {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }
}
