//! `orthocache grid`: show the tile grid for the configured region.

use std::path::Path;

use clap::Args;
use orthocache::cache::{CacheKey, DiskTileCache, TileCache};
use orthocache::coord::TileGrid;

use super::common::{build_runtime, load_config};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct GridArgs {
    /// Also count how many tiles are already satisfied in the cache
    #[arg(long)]
    pub check: bool,
}

/// Prints per-zoom tile counts, optionally checked against the cache.
pub fn run(args: GridArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let grid = config.grid().map_err(|e| CliError::Config(e.to_string()))?;

    let region = grid.bbox();
    println!(
        "Region: lat {} .. {}, lon {} .. {}",
        region.min_lat, region.max_lat, region.min_lon, region.max_lon
    );

    let cached = if args.check {
        let cache = DiskTileCache::open(&config.cache.directory)?;
        let runtime = build_runtime()?;
        Some(runtime.block_on(count_cached(&cache, &grid))?)
    } else {
        None
    };

    println!();
    println!(
        "{:>4}  {:>13}  {:>13}  {:>9}{}",
        "zoom",
        "columns",
        "rows",
        "tiles",
        if cached.is_some() { "     cached" } else { "" }
    );
    for range in grid.zoom_ranges() {
        let mut line = format!(
            "{:>4}  {:>13}  {:>13}  {:>9}",
            range.zoom,
            format!("{}-{}", range.col_min, range.col_max),
            format!("{}-{}", range.row_min, range.row_max),
            range.tile_count()
        );
        if let Some(cached) = &cached {
            line.push_str(&format!("  {:>9}", cached[usize::from(range.zoom - grid.zooms().start())]));
        }
        println!("{}", line);
    }

    let total = grid.tile_count();
    println!();
    match cached {
        Some(cached) => {
            let present: u64 = cached.iter().sum();
            println!(
                "Total: {} tiles, {} cached ({:.1}%), {} missing",
                total,
                present,
                percent(present, total),
                total - present
            );
            println!("Cache: {}", config.cache.directory.display());
        }
        None => println!("Total: {} tiles", total),
    }
    Ok(())
}

/// Satisfied tiles per zoom level, lowest zoom first.
async fn count_cached(cache: &DiskTileCache, grid: &TileGrid) -> Result<Vec<u64>, CliError> {
    let mut counts = vec![0u64; grid.zooms().len()];
    let first = *grid.zooms().start();
    for tile in grid.iter() {
        if cache.contains(&CacheKey::esri(tile)).await? {
            counts[usize::from(tile.zoom - first)] += 1;
        }
    }
    Ok(counts)
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthocache::coord::{GeoBoundingBox, TileCoord};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_count_cached_per_zoom() {
        let dir = TempDir::new().unwrap();
        let cache = DiskTileCache::open(dir.path()).unwrap();
        let grid = TileGrid::new(GeoBoundingBox::malta(), 12, 13).unwrap();

        for tile in grid.iter().take(3) {
            cache.set(&CacheKey::esri(tile), vec![1]).await.unwrap();
        }
        let z13 = TileCoord::new(13, 4424, 3219).unwrap();
        cache.set(&CacheKey::esri(z13), vec![1]).await.unwrap();

        let counts = count_cached(&cache, &grid).await.unwrap();
        assert_eq!(counts, vec![3, 1]);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(0, 0), 100.0);
    }
}
