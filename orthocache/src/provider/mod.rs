//! Remote imagery origins.
//!
//! This module provides the HTTP client abstraction and the raster tile
//! provider the bulk sync downloads from:
//!
//! - [`AsyncHttpClient`] / [`AsyncReqwestClient`]: GET with timeout and
//!   status checking
//! - [`AsyncProvider`]: one raster tile per [`TileCoord`](crate::coord::TileCoord)
//! - [`AsyncArcGisProvider`]: Esri World Imagery
//!
//! ```ignore
//! use orthocache::provider::{AsyncArcGisProvider, AsyncReqwestClient};
//!
//! let client = AsyncReqwestClient::new()?;
//! let provider = AsyncArcGisProvider::new(client);
//! let jpeg = provider.download_tile(&tile).await?;
//! ```

mod arcgis;
mod http;
mod types;

pub use arcgis::AsyncArcGisProvider;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT};
pub use types::{AsyncProvider, ProviderError};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
