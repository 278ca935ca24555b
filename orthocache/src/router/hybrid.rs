//! Request-time dispatch between the local cache and the WMS proxy.

use std::sync::Arc;

use tracing::{debug, warn};

use super::request::TileRequest;
use crate::cache::{CacheKey, TileCache};
use crate::coord::TileCoord;
use crate::provider::AsyncHttpClient;
use crate::wms::{WmsError, WmsGetMap, WmsProxy};

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Result of routing one tile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileResponse {
    Image {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    NotFound(String),
    BadRequest(String),
    BadGateway(String),
}

/// Serves local-raster requests from the cache and historical-overlay
/// requests through the WMS proxy.
///
/// Holds no per-request state. The cache is only ever read here; bulk
/// sync is the sole writer.
pub struct HybridRouter<C: AsyncHttpClient> {
    cache: Arc<dyn TileCache>,
    wms: WmsProxy<C>,
}

impl<C: AsyncHttpClient> HybridRouter<C> {
    pub fn new(cache: Arc<dyn TileCache>, wms: WmsProxy<C>) -> Self {
        Self { cache, wms }
    }

    pub async fn route(&self, request: &TileRequest) -> TileResponse {
        match request {
            TileRequest::LocalRaster(tile) => self.serve_local(tile).await,
            TileRequest::HistoricalOverlay { year, map } => self.serve_overlay(year, map).await,
        }
    }

    async fn serve_local(&self, tile: &TileCoord) -> TileResponse {
        let key = CacheKey::esri(*tile);
        match self.cache.get(&key).await {
            Ok(Some(bytes)) => {
                debug!(tile = %tile, bytes = bytes.len(), "Local cache hit");
                TileResponse::Image {
                    content_type: JPEG_CONTENT_TYPE,
                    bytes,
                }
            }
            Ok(None) => {
                debug!(tile = %tile, "Local cache miss");
                TileResponse::NotFound(format!("Tile {} not in local cache", tile))
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "Local cache read failed");
                TileResponse::NotFound(format!("Tile {} not in local cache", tile))
            }
        }
    }

    async fn serve_overlay(&self, year: &str, map: &WmsGetMap) -> TileResponse {
        match self.wms.render(year, map).await {
            Ok(bytes) => TileResponse::Image {
                content_type: PNG_CONTENT_TYPE,
                bytes,
            },
            Err(e @ WmsError::UnknownEpoch(_)) => TileResponse::BadRequest(e.to_string()),
            Err(e @ WmsError::UpstreamUnavailable) => TileResponse::BadGateway(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryTileCache;
    use crate::provider::{MockAsyncHttpClient, ProviderError};

    fn tile() -> TileCoord {
        TileCoord {
            zoom: 16,
            col: 35380,
            row: 25720,
        }
    }

    fn overlay(year: &str) -> TileRequest {
        TileRequest::HistoricalOverlay {
            year: year.to_string(),
            map: WmsGetMap {
                bbox: "1575000,4275000,1577500,4277500".to_string(),
                width: 256,
                height: 256,
            },
        }
    }

    fn router(
        cache: &Arc<MemoryTileCache>,
        client: &MockAsyncHttpClient,
    ) -> HybridRouter<MockAsyncHttpClient> {
        HybridRouter::new(
            Arc::clone(cache) as Arc<dyn TileCache>,
            WmsProxy::new(client.clone()),
        )
    }

    #[tokio::test]
    async fn test_local_hit_returns_jpeg() {
        let cache = Arc::new(MemoryTileCache::new());
        cache
            .set(&CacheKey::esri(tile()), vec![0xFF, 0xD8])
            .await
            .unwrap();
        let client = MockAsyncHttpClient::ok(vec![1]);

        let response = router(&cache, &client)
            .route(&TileRequest::LocalRaster(tile()))
            .await;

        assert_eq!(
            response,
            TileResponse::Image {
                content_type: "image/jpeg",
                bytes: vec![0xFF, 0xD8],
            }
        );
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_local_miss_makes_no_network_call() {
        let cache = Arc::new(MemoryTileCache::new());
        let client = MockAsyncHttpClient::ok(vec![1]);

        let response = router(&cache, &client)
            .route(&TileRequest::LocalRaster(tile()))
            .await;

        assert!(matches!(response, TileResponse::NotFound(_)));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_local_empty_entry_is_miss() {
        let cache = Arc::new(MemoryTileCache::new());
        cache.insert_raw(CacheKey::esri(tile()), Vec::new());
        let client = MockAsyncHttpClient::ok(vec![1]);

        let response = router(&cache, &client)
            .route(&TileRequest::LocalRaster(tile()))
            .await;
        assert!(matches!(response, TileResponse::NotFound(_)));
    }

    #[tokio::test]
    async fn test_overlay_success_returns_png_and_is_not_cached() {
        let cache = Arc::new(MemoryTileCache::new());
        let client = MockAsyncHttpClient::ok(vec![0x89, b'P', b'N', b'G']);

        let response = router(&cache, &client).route(&overlay("1896")).await;

        assert_eq!(
            response,
            TileResponse::Image {
                content_type: "image/png",
                bytes: vec![0x89, b'P', b'N', b'G'],
            }
        );
        assert_eq!(client.request_count(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_overlay_unknown_epoch_is_bad_request() {
        let cache = Arc::new(MemoryTileCache::new());
        let client = MockAsyncHttpClient::ok(vec![1]);

        let response = router(&cache, &client).route(&overlay("1850")).await;

        assert!(matches!(response, TileResponse::BadRequest(_)));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_overlay_upstream_failure_is_bad_gateway() {
        let cache = Arc::new(MemoryTileCache::new());
        let client = MockAsyncHttpClient::err(ProviderError::Timeout("wms".to_string()));

        let response = router(&cache, &client).route(&overlay("2018")).await;

        assert!(matches!(response, TileResponse::BadGateway(_)));
        assert!(cache.is_empty());
    }
}
