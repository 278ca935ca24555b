//! Provider types and traits

use std::future::Future;

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors that can occur during provider operations.
///
/// Callers that only care about success or failure (the sync engine, the
/// WMS proxy) treat every variant the same; the variants exist for logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, reading the body)
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// Upstream answered 2xx with no body
    #[error("Empty response from {0}")]
    EmptyResponse(String),
    /// Zoom level not supported by this provider
    #[error("Zoom level {0} not supported by provider")]
    UnsupportedZoom(u8),
}

impl ProviderError {
    /// True for failures caused by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

/// Async trait for raster tile origins.
///
/// A successful result always carries a complete, non-empty body; any
/// transport error, timeout, non-2xx status or empty body is an `Err`.
pub trait AsyncProvider: Send + Sync {
    /// Downloads one raster tile.
    ///
    /// # Returns
    ///
    /// Raw image data (typically JPEG format) or an error.
    fn download_tile(
        &self,
        tile: &TileCoord,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this provider supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}
