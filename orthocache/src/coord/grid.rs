//! Tile grid enumeration over a bounding box and zoom range.
//!
//! [`TileGrid`] is a value type: it holds only the bounding box and the zoom
//! range, and every call to [`TileGrid::iter`] recomputes the column and row
//! ranges from scratch. Two grids built from the same inputs yield the same
//! tiles in the same order, which is what makes repeated sync runs
//! comparable.
//!
//! ```text
//!            min_lon            max_lon
//!   max_lat ┌───┬───┬───┬───┐              row_min = lat_to_row(max_lat)
//!           │   │   │   │   │              row_max = lat_to_row(min_lat)
//!           ├───┼───┼───┼───┤              col_min = lon_to_col(min_lon)
//!           │   │   │   │   │              col_max = lon_to_col(max_lon)
//!   min_lat └───┴───┴───┴───┘
//! ```

use std::ops::RangeInclusive;

use super::types::{tiles_per_side, CoordError, GeoBoundingBox, TileCoord, MAX_ZOOM};
use super::{lat_to_row, lon_to_col};

/// Column and row ranges covering the bounding box at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    pub zoom: u8,
    pub col_min: u32,
    pub col_max: u32,
    pub row_min: u32,
    pub row_max: u32,
}

impl ZoomRange {
    fn compute(bbox: &GeoBoundingBox, zoom: u8) -> Self {
        // lon = 180 and the southern latitude limit land one past the last index
        let last = (tiles_per_side(zoom) - 1) as u32;
        // Row indices grow southwards, so the northern edge gives the minimum
        Self {
            zoom,
            col_min: lon_to_col(bbox.min_lon, zoom).min(last),
            col_max: lon_to_col(bbox.max_lon, zoom).min(last),
            row_min: lat_to_row(bbox.max_lat, zoom).min(last),
            row_max: lat_to_row(bbox.min_lat, zoom).min(last),
        }
    }

    /// Number of columns in the range.
    pub fn width(&self) -> u64 {
        u64::from(self.col_max - self.col_min) + 1
    }

    /// Number of rows in the range.
    pub fn height(&self) -> u64 {
        u64::from(self.row_max - self.row_min) + 1
    }

    /// Number of tiles in the range.
    pub fn tile_count(&self) -> u64 {
        self.width() * self.height()
    }
}

/// Every tile covering a bounding box across an inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    bbox: GeoBoundingBox,
    min_zoom: u8,
    max_zoom: u8,
}

impl TileGrid {
    /// Creates a grid for `bbox` over `min_zoom..=max_zoom`.
    pub fn new(bbox: GeoBoundingBox, min_zoom: u8, max_zoom: u8) -> Result<Self, CoordError> {
        if max_zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(max_zoom));
        }
        if min_zoom > max_zoom {
            return Err(CoordError::InvalidZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }
        Ok(Self {
            bbox,
            min_zoom,
            max_zoom,
        })
    }

    pub fn bbox(&self) -> &GeoBoundingBox {
        &self.bbox
    }

    pub fn zooms(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// Per-zoom column/row ranges, lowest zoom first.
    pub fn zoom_ranges(&self) -> impl Iterator<Item = ZoomRange> + '_ {
        self.zooms().map(|zoom| ZoomRange::compute(&self.bbox, zoom))
    }

    /// Total number of tiles the grid enumerates.
    pub fn tile_count(&self) -> u64 {
        self.zoom_ranges().map(|r| r.tile_count()).sum()
    }

    /// Returns a fresh iterator over every tile in the grid.
    pub fn iter(&self) -> TileGridIter {
        let remaining = self.tile_count();
        TileGridIter {
            bbox: self.bbox,
            max_zoom: self.max_zoom,
            range: ZoomRange::compute(&self.bbox, self.min_zoom),
            col: None,
            row: 0,
            remaining,
        }
    }
}

impl IntoIterator for &TileGrid {
    type Item = TileCoord;
    type IntoIter = TileGridIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`TileGrid`].
///
/// Yields zoom levels in ascending order; within a zoom, columns west to
/// east and, for each column, rows north to south.
#[derive(Debug, Clone)]
pub struct TileGridIter {
    bbox: GeoBoundingBox,
    max_zoom: u8,
    range: ZoomRange,
    /// Current column, `None` before the first tile of a zoom.
    col: Option<u32>,
    row: u32,
    remaining: u64,
}

impl Iterator for TileGridIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let col = match self.col {
            None => {
                self.row = self.range.row_min;
                self.range.col_min
            }
            Some(col) if self.row < self.range.row_max => {
                self.row += 1;
                col
            }
            Some(col) if col < self.range.col_max => {
                self.row = self.range.row_min;
                col + 1
            }
            Some(_) => {
                // Zoom exhausted, move to the next one
                let zoom = self.range.zoom + 1;
                if zoom > self.max_zoom {
                    self.remaining = 0;
                    return None;
                }
                self.range = ZoomRange::compute(&self.bbox, zoom);
                self.row = self.range.row_min;
                self.range.col_min
            }
        };

        self.col = Some(col);
        self.remaining -= 1;
        Some(TileCoord {
            zoom: self.range.zoom,
            col,
            row: self.row,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileGridIter {}
