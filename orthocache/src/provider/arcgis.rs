//! ArcGIS World Imagery provider.
//!
//! Provides access to Esri's World Imagery basemap, the origin the local
//! raster cache is populated from.
//!
//! # URL Pattern
//!
//! `https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}`
//!
//! - Uses standard XYZ tile coordinates (y=row, x=col)
//! - No authentication required for the public tier
//! - Rate limited; keep bulk concurrency modest
//!
//! # Terms of Use
//!
//! The World Imagery basemap is provided by Esri and is subject to their
//! terms of use. See: <https://www.esri.com/en-us/legal/terms/full-master-agreement>

use tracing::trace;

use crate::coord::TileCoord;
use crate::provider::{AsyncHttpClient, AsyncProvider, ProviderError};

/// Base URL for ArcGIS World Imagery tiles.
const ARCGIS_BASE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile";

/// Minimum zoom level supported by ArcGIS World Imagery.
const MIN_ZOOM: u8 = 0;

/// Maximum zoom level supported by ArcGIS World Imagery.
const MAX_ZOOM: u8 = 19;

/// Async ArcGIS World Imagery provider.
pub struct AsyncArcGisProvider<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> AsyncArcGisProvider<C> {
    /// Creates a new async ArcGIS World Imagery provider.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, ARCGIS_BASE_URL)
    }

    /// Creates a provider against a different tile endpoint with the same
    /// `{base}/{z}/{y}/{x}` layout (a mirror, or a local test server).
    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the tile URL for the given coordinates.
    ///
    /// ArcGIS uses the pattern: `{base}/tile/{z}/{y}/{x}`
    fn build_url(&self, tile: &TileCoord) -> String {
        format!("{}/{}/{}/{}", self.base_url, tile.zoom, tile.row, tile.col)
    }
}

impl<C: AsyncHttpClient> AsyncProvider for AsyncArcGisProvider<C> {
    async fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(tile.zoom) {
            return Err(ProviderError::UnsupportedZoom(tile.zoom));
        }

        let url = self.build_url(tile);
        let data = self.http_client.get(&url).await?;
        if data.is_empty() {
            return Err(ProviderError::EmptyResponse(url));
        }
        trace!(tile = %tile, bytes = data.len(), "Downloaded tile");
        Ok(data)
    }

    fn name(&self) -> &str {
        "ArcGIS"
    }

    fn min_zoom(&self) -> u8 {
        MIN_ZOOM
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    fn sample_jpeg_response() -> Vec<u8> {
        // Minimal valid JPEG header
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46]
    }

    fn tile(zoom: u8, col: u32, row: u32) -> TileCoord {
        TileCoord { zoom, col, row }
    }

    #[test]
    fn test_zoom_range() {
        let provider = AsyncArcGisProvider::new(MockAsyncHttpClient::ok(sample_jpeg_response()));
        assert_eq!(provider.name(), "ArcGIS");
        assert!(provider.supports_zoom(0));
        assert!(provider.supports_zoom(19));
        assert!(!provider.supports_zoom(20));
    }

    #[test]
    fn test_url_puts_row_before_column() {
        let provider = AsyncArcGisProvider::new(MockAsyncHttpClient::ok(sample_jpeg_response()));

        let url = provider.build_url(&tile(15, 200, 100));
        assert_eq!(
            url,
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/15/100/200"
        );
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let provider = AsyncArcGisProvider::with_base_url(
            MockAsyncHttpClient::ok(sample_jpeg_response()),
            "http://mirror.local/tile/",
        );
        assert_eq!(
            provider.build_url(&tile(12, 2208, 1607)),
            "http://mirror.local/tile/12/1607/2208"
        );
    }

    #[tokio::test]
    async fn test_download_tile_success() {
        let client = MockAsyncHttpClient::ok(sample_jpeg_response());
        let provider = AsyncArcGisProvider::new(client.clone());

        let result = provider.download_tile(&tile(15, 200, 100)).await;
        assert_eq!(result.unwrap(), sample_jpeg_response());
        assert!(client.last_url().unwrap().ends_with("/15/100/200"));
    }

    #[tokio::test]
    async fn test_download_tile_unsupported_zoom_makes_no_request() {
        let client = MockAsyncHttpClient::ok(sample_jpeg_response());
        let provider = AsyncArcGisProvider::new(client.clone());

        let result = provider.download_tile(&tile(20, 0, 0)).await;
        assert_eq!(result, Err(ProviderError::UnsupportedZoom(20)));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_download_tile_empty_body_is_failure() {
        let provider = AsyncArcGisProvider::new(MockAsyncHttpClient::ok(Vec::new()));

        let result = provider.download_tile(&tile(15, 200, 100)).await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn test_download_tile_network_error() {
        let provider = AsyncArcGisProvider::new(MockAsyncHttpClient::err(
            ProviderError::HttpError("Connection refused".to_string()),
        ));

        match provider.download_tile(&tile(15, 200, 100)).await {
            Err(ProviderError::HttpError(msg)) => assert!(msg.contains("Connection refused")),
            other => panic!("Expected HttpError, got {:?}", other),
        }
    }
}
