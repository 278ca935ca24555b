//! Tile request parsing.
//!
//! Requests arrive as flat query strings. Every field is optional at the
//! wire level; which ones are required depends on the `source` tag, and
//! numeric values are parsed here so that a malformed value is rejected
//! with a specific message.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::coord::{CoordError, TileCoord};
use crate::wms::WmsGetMap;

/// Where a tile request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSource {
    /// Local raster cache only. Never touches the network.
    LocalRaster,
    /// Live WMS rendering of a historical epoch. Never cached.
    HistoricalOverlay,
}

impl TileSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileSource::LocalRaster => "local-raster",
            TileSource::HistoricalOverlay => "historical-overlay",
        }
    }
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileSource {
    type Err = RouteError;

    /// Accepts the canonical tags and the short `esri` / `pa` aliases used
    /// by existing map clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-raster" | "esri" => Ok(TileSource::LocalRaster),
            "historical-overlay" | "pa" => Ok(TileSource::HistoricalOverlay),
            other => Err(RouteError::UnknownSource(other.to_string())),
        }
    }
}

/// Errors from validating a tile request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("Unknown tile source '{0}'")]
    UnknownSource(String),
    #[error("Missing query parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("Invalid value '{value}' for query parameter '{name}'")]
    InvalidParameter { name: &'static str, value: String },
    #[error("Invalid tile: {0}")]
    InvalidTile(#[from] CoordError),
}

/// Raw query string of `GET /tiles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileQuery {
    pub source: Option<String>,
    pub z: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub year: Option<String>,
    pub bbox: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// A validated tile request.
#[derive(Debug, Clone, PartialEq)]
pub enum TileRequest {
    LocalRaster(TileCoord),
    HistoricalOverlay { year: String, map: WmsGetMap },
}

impl TileRequest {
    pub fn source(&self) -> TileSource {
        match self {
            TileRequest::LocalRaster(_) => TileSource::LocalRaster,
            TileRequest::HistoricalOverlay { .. } => TileSource::HistoricalOverlay,
        }
    }

    /// Validates a query against the parameters its source requires.
    ///
    /// `x` is the tile column and `y` the tile row.
    pub fn from_query(query: &TileQuery) -> Result<Self, RouteError> {
        let source: TileSource = required("source", &query.source)?.parse()?;
        match source {
            TileSource::LocalRaster => {
                let zoom = parse("z", &query.z)?;
                let col = parse("x", &query.x)?;
                let row = parse("y", &query.y)?;
                Ok(TileRequest::LocalRaster(TileCoord::new(zoom, col, row)?))
            }
            TileSource::HistoricalOverlay => {
                let year = required("year", &query.year)?.to_string();
                let bbox = required("bbox", &query.bbox)?;
                if bbox.is_empty() {
                    return Err(RouteError::InvalidParameter {
                        name: "bbox",
                        value: String::new(),
                    });
                }
                let width = parse_dimension("width", &query.width)?;
                let height = parse_dimension("height", &query.height)?;
                Ok(TileRequest::HistoricalOverlay {
                    year,
                    map: WmsGetMap {
                        bbox: bbox.to_string(),
                        width,
                        height,
                    },
                })
            }
        }
    }
}

fn required<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str, RouteError> {
    value.as_deref().ok_or(RouteError::MissingParameter(name))
}

fn parse<T: FromStr>(name: &'static str, value: &Option<String>) -> Result<T, RouteError> {
    let raw = required(name, value)?;
    raw.trim().parse().map_err(|_| RouteError::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

fn parse_dimension(name: &'static str, value: &Option<String>) -> Result<u32, RouteError> {
    match parse::<u32>(name, value)? {
        0 => Err(RouteError::InvalidParameter {
            name,
            value: "0".to_string(),
        }),
        n => Ok(n),
    }
}
