//! HTTP surface for tile serving.
//!
//! - `GET /tiles?source=local-raster&z=&x=&y=`
//! - `GET /tiles?source=historical-overlay&year=&bbox=&width=&height=`
//! - `GET /health`
//!
//! Images are returned with their content type; every error is a short
//! plain-text body with the matching status code.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::provider::AsyncHttpClient;
use crate::router::{HybridRouter, TileQuery, TileRequest, TileResponse};

/// Default listen address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Builds the tile-serving router around a [`HybridRouter`].
pub fn tile_router<C>(router: Arc<HybridRouter<C>>) -> Router
where
    C: AsyncHttpClient + 'static,
{
    Router::new()
        .route("/tiles", get(get_tile::<C>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(router)
}

/// Binds `addr` and serves `app` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after shutdown is signalled.
pub async fn serve<F>(addr: SocketAddr, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(addr = %listener.local_addr()?, "Tile server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Tile server stopped");
    Ok(())
}

async fn get_tile<C>(
    State(router): State<Arc<HybridRouter<C>>>,
    Query(query): Query<TileQuery>,
) -> TileResponse
where
    C: AsyncHttpClient + 'static,
{
    match TileRequest::from_query(&query) {
        Ok(request) => router.route(&request).await,
        Err(e) => {
            debug!(error = %e, "Rejected tile request");
            TileResponse::BadRequest(e.to_string())
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

impl IntoResponse for TileResponse {
    fn into_response(self) -> Response {
        match self {
            TileResponse::Image {
                content_type,
                bytes,
            } => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
            TileResponse::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            TileResponse::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            TileResponse::BadGateway(message) => {
                (StatusCode::BAD_GATEWAY, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TileResponse::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TileResponse::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (TileResponse::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (
                TileResponse::Image {
                    content_type: "image/jpeg",
                    bytes: vec![1],
                },
                StatusCode::OK,
            ),
        ];
        for (response, status) in cases {
            assert_eq!(response.into_response().status(), status);
        }
    }

    #[test]
    fn test_image_content_type() {
        let response = TileResponse::Image {
            content_type: "image/png",
            bytes: vec![1, 2],
        }
        .into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_default_bind_parses() {
        assert!(DEFAULT_BIND.parse::<SocketAddr>().is_ok());
    }
}
