//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Renders a config as the commented INI written by `config init`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[region]
; Operational area in degrees. Every tile touching this box is synced.
min_lat = {}
max_lat = {}
min_lon = {}
max_lon = {}

[sync]
; Zoom range to keep in the local raster cache (0-22)
min_zoom = {}
max_zoom = {}
; Concurrent downloads from the tile origin
concurrency = {}
; Per-tile fetch timeout in seconds
timeout = {}

[cache]
; Directory holding one file per tile (esri_<z>_<x>_<y>.jpg)
directory = {}

[server]
; Listen address for `orthocache serve`
bind = {}
; Timeout for historical imagery WMS requests, in seconds
wms_timeout = {}
"#,
        config.region.min_lat,
        config.region.max_lat,
        config.region.min_lon,
        config.region.max_lon,
        config.sync.min_zoom,
        config.sync.max_zoom,
        config.sync.concurrency,
        config.sync.timeout,
        path_to_string(&config.cache.directory),
        config.server.bind,
        config.server.wms_timeout,
    )
}

/// Shortens paths under the home directory to `~/...`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_written_config_reads_back() {
        let mut config = ConfigFile::default();
        config.sync.concurrency = 6;
        config.cache.directory = PathBuf::from("/data/tile_cache");

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, to_config_string(&config)).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_contains_every_section() {
        let content = to_config_string(&ConfigFile::default());
        for section in ["[region]", "[sync]", "[cache]", "[server]"] {
            assert!(content.contains(section), "missing {}", section);
        }
        assert!(content.contains("min_zoom = 12"));
        assert!(content.contains("max_zoom = 19"));
        assert!(content.contains("concurrency = 20"));
    }
}
