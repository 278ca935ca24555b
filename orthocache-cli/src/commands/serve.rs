//! `orthocache serve`: run the tile-serving HTTP surface.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Args;
use orthocache::cache::{DiskTileCache, TileCache};
use orthocache::provider::AsyncReqwestClient;
use orthocache::router::HybridRouter;
use orthocache::server::{serve, tile_router};
use orthocache::wms::{WmsEpoch, WmsProxy};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::{build_runtime, cancel_on_ctrl_c, load_config, start_logging};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides [server] bind, default 127.0.0.1:3000)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Serves tiles until Ctrl+C.
pub fn run(args: ServeArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let addr = args.bind.unwrap_or(config.server.bind);
    let _logging = start_logging(false)?;

    let cache: Arc<dyn TileCache> = Arc::new(DiskTileCache::open(&config.cache.directory)?);

    let runtime = build_runtime()?;
    runtime.block_on(async {
        let client =
            AsyncReqwestClient::with_timeout(config.wms_timeout()).map_err(CliError::HttpClient)?;
        let proxy = WmsProxy::with_timeout(client, config.wms_timeout());
        let app = tile_router(Arc::new(HybridRouter::new(cache, proxy)));

        info!(
            cache = %config.cache.directory.display(),
            epochs = %WmsEpoch::years().collect::<Vec<_>>().join(","),
            "Serving local raster and historical overlay tiles"
        );
        println!("Serving tiles on http://{} (Ctrl+C to stop)", addr);

        let shutdown = CancellationToken::new();
        cancel_on_ctrl_c(shutdown.clone());
        serve(addr, app, async move { shutdown.cancelled().await }).await?;
        Ok::<(), CliError>(())
    })
}
