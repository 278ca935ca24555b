//! Hybrid tile routing.
//!
//! A request carries a source tag. `local-raster` requests are answered
//! strictly from the cache: a miss is a miss, and nothing is fetched at
//! request time. `historical-overlay` requests are forwarded to the WMS
//! proxy and never stored.

mod hybrid;
mod request;

pub use hybrid::{HybridRouter, TileResponse, JPEG_CONTENT_TYPE, PNG_CONTENT_TYPE};
pub use request::{RouteError, TileQuery, TileRequest, TileSource};
