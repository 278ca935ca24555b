//! WMS GetMap proxy.
//!
//! Translates an overlay request (epoch, bbox, size) into a WMS 1.3.0
//! GetMap call against the authority serving that epoch and returns the
//! rendered PNG. The caller's bbox, width and height are forwarded as-is;
//! everything else is fixed.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::epoch::WmsEpoch;
use crate::provider::{AsyncHttpClient, DEFAULT_TIMEOUT};

/// Protocol parameters sent with every GetMap request.
const FIXED_PARAMS: [(&str, &str); 7] = [
    ("service", "WMS"),
    ("request", "GetMap"),
    ("version", "1.3.0"),
    ("styles", ""),
    ("crs", "EPSG:3857"),
    ("format", "image/png"),
    ("transparent", "true"),
];

/// Leading bytes of every PNG file.
const PNG_MAGIC: &[u8] = b"\x89PNG";

/// Caller-supplied portion of a GetMap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsGetMap {
    /// Bounding box in the request CRS, exactly as the client sent it.
    pub bbox: String,
    pub width: u32,
    pub height: u32,
}

/// Errors reported by [`WmsProxy::render`].
///
/// Upstream failures collapse into one variant; the detail is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmsError {
    #[error("Unknown imagery epoch '{0}'")]
    UnknownEpoch(String),
    #[error("Upstream imagery service unavailable")]
    UpstreamUnavailable,
}

/// Forwards overlay requests to historical-imagery WMS servers.
pub struct WmsProxy<C: AsyncHttpClient> {
    http_client: C,
    timeout: Duration,
}

impl<C: AsyncHttpClient> WmsProxy<C> {
    pub fn new(http_client: C) -> Self {
        Self::with_timeout(http_client, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(http_client: C, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }

    /// Builds the GetMap URL for an epoch.
    pub fn build_url(epoch: &WmsEpoch, request: &WmsGetMap) -> Result<String, WmsError> {
        let width = request.width.to_string();
        let height = request.height.to_string();
        let mut params: Vec<(&str, &str)> = FIXED_PARAMS.to_vec();
        params.extend([
            ("layers", epoch.layer),
            ("bbox", request.bbox.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ]);

        reqwest::Url::parse_with_params(epoch.endpoint, params)
            .map(String::from)
            .map_err(|e| {
                warn!(endpoint = epoch.endpoint, error = %e, "Invalid WMS endpoint");
                WmsError::UpstreamUnavailable
            })
    }

    /// Renders `request` from the authority serving `year`.
    pub async fn render(&self, year: &str, request: &WmsGetMap) -> Result<Vec<u8>, WmsError> {
        let epoch =
            WmsEpoch::lookup(year).ok_or_else(|| WmsError::UnknownEpoch(year.to_string()))?;
        let url = Self::build_url(epoch, request)?;

        debug!(
            year = epoch.year,
            layer = epoch.layer,
            bbox = %request.bbox,
            width = request.width,
            height = request.height,
            "Forwarding WMS GetMap"
        );

        match tokio::time::timeout(self.timeout, self.http_client.get(&url)).await {
            Ok(Ok(data)) if data.starts_with(PNG_MAGIC) => Ok(data),
            Ok(Ok(data)) if data.is_empty() => {
                warn!(year = epoch.year, "WMS upstream returned empty image");
                Err(WmsError::UpstreamUnavailable)
            }
            // Service exceptions arrive as XML with a 200 status
            Ok(Ok(data)) => {
                warn!(
                    year = epoch.year,
                    bytes = data.len(),
                    body = %String::from_utf8_lossy(&data[..data.len().min(200)]),
                    "WMS upstream returned a non-PNG body"
                );
                Err(WmsError::UpstreamUnavailable)
            }
            Ok(Err(e)) => {
                warn!(year = epoch.year, error = %e, "WMS upstream request failed");
                Err(WmsError::UpstreamUnavailable)
            }
            Err(_) => {
                warn!(
                    year = epoch.year,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "WMS upstream timed out"
                );
                Err(WmsError::UpstreamUnavailable)
            }
        }
    }
}
