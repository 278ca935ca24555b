//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{GeoBoundingBox, MAX_ZOOM};

/// Parses an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [region] section
    if let Some(section) = ini.section(Some("region")) {
        let mut region = config.region;
        parse_into(section, "region", "min_lat", &mut region.min_lat, "must be a number (degrees)")?;
        parse_into(section, "region", "max_lat", &mut region.max_lat, "must be a number (degrees)")?;
        parse_into(section, "region", "min_lon", &mut region.min_lon, "must be a number (degrees)")?;
        parse_into(section, "region", "max_lon", &mut region.max_lon, "must be a number (degrees)")?;

        config.region = GeoBoundingBox::new(
            region.min_lat,
            region.max_lat,
            region.min_lon,
            region.max_lon,
        )
        .map_err(|e| ConfigFileError::InvalidValue {
            section: "region".to_string(),
            key: "bounds".to_string(),
            value: format!(
                "{},{} .. {},{}",
                region.min_lat, region.min_lon, region.max_lat, region.max_lon
            ),
            reason: e.to_string(),
        })?;
    }

    // [sync] section
    if let Some(section) = ini.section(Some("sync")) {
        let zoom_reason = format!("must be an integer between 0 and {}", MAX_ZOOM);
        parse_into(section, "sync", "min_zoom", &mut config.sync.min_zoom, &zoom_reason)?;
        parse_into(section, "sync", "max_zoom", &mut config.sync.max_zoom, &zoom_reason)?;
        if config.sync.max_zoom > MAX_ZOOM {
            return Err(invalid("sync", "max_zoom", config.sync.max_zoom, &zoom_reason));
        }
        if config.sync.min_zoom > config.sync.max_zoom {
            return Err(invalid(
                "sync",
                "min_zoom",
                config.sync.min_zoom,
                "must not be greater than max_zoom",
            ));
        }

        parse_into(
            section,
            "sync",
            "concurrency",
            &mut config.sync.concurrency,
            "must be a positive integer",
        )?;
        if config.sync.concurrency == 0 {
            return Err(invalid("sync", "concurrency", 0, "must be a positive integer"));
        }

        parse_into(
            section,
            "sync",
            "timeout",
            &mut config.sync.timeout,
            "must be a positive integer (seconds)",
        )?;
        if config.sync.timeout == 0 {
            return Err(invalid("sync", "timeout", 0, "must be a positive integer (seconds)"));
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        parse_into(
            section,
            "server",
            "bind",
            &mut config.server.bind,
            "must be a socket address like 127.0.0.1:3000",
        )?;
        parse_into(
            section,
            "server",
            "wms_timeout",
            &mut config.server.wms_timeout,
            "must be a positive integer (seconds)",
        )?;
        if config.server.wms_timeout == 0 {
            return Err(invalid(
                "server",
                "wms_timeout",
                0,
                "must be a positive integer (seconds)",
            ));
        }
    }

    Ok(config)
}

/// Parses `key` into `target` when present; leaves the default otherwise.
fn parse_into<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    target: &mut T,
    reason: &str,
) -> Result<(), ConfigFileError> {
    if let Some(v) = section.get(key) {
        *target = v
            .trim()
            .parse()
            .map_err(|_| invalid(section_name, key, v, reason))?;
    }
    Ok(())
}

fn invalid(
    section: &str,
    key: &str,
    value: impl ToString,
    reason: &str,
) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use std::net::SocketAddr;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = load("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_full_file() {
        let config = load(
            r#"
[region]
min_lat = 35.8
max_lat = 36.0
min_lon = 14.2
max_lon = 14.6

[sync]
min_zoom = 13
max_zoom = 17
concurrency = 8
timeout = 5

[cache]
directory = /srv/tiles

[server]
bind = 0.0.0.0:8080
wms_timeout = 10
"#,
        )
        .unwrap();

        assert_eq!(config.region, GeoBoundingBox::new(35.8, 36.0, 14.2, 14.6).unwrap());
        assert_eq!(config.sync.min_zoom, 13);
        assert_eq!(config.sync.max_zoom, 17);
        assert_eq!(config.sync.concurrency, 8);
        assert_eq!(config.sync.timeout, 5);
        assert_eq!(config.cache.directory, PathBuf::from("/srv/tiles"));
        assert_eq!(config.server.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.server.wms_timeout, 10);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = load("[sync]\nconcurrency = 4\n").unwrap();
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.sync.min_zoom, DEFAULT_MIN_ZOOM);
        assert_eq!(config.sync.max_zoom, DEFAULT_MAX_ZOOM);
        assert_eq!(config.sync.timeout, DEFAULT_SYNC_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_number() {
        let err = load("[sync]\nconcurrency = lots\n").unwrap_err();
        assert!(err.to_string().contains("sync.concurrency"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = load("[sync]\nconcurrency = 0\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "concurrency"));
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let err = load("[sync]\nmin_zoom = 15\nmax_zoom = 12\n").unwrap_err();
        assert!(err.to_string().contains("min_zoom"));
    }

    #[test]
    fn test_zoom_above_maximum_rejected() {
        let err = load("[sync]\nmax_zoom = 30\n").unwrap_err();
        assert!(err.to_string().contains("max_zoom"));
    }

    #[test]
    fn test_inverted_region_rejected() {
        let err = load("[region]\nmin_lat = 36.5\nmax_lat = 36.0\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref section, .. } if section == "region"));
    }

    #[test]
    fn test_region_outside_projection_rejected() {
        assert!(load("[region]\nmax_lat = 89.0\n").is_err());
    }

    #[test]
    fn test_invalid_bind_address() {
        let err = load("[server]\nbind = localhost\n").unwrap_err();
        assert!(err.to_string().contains("server.bind"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/tiles");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("tiles"));
        }
        assert_eq!(expand_tilde("/abs/tiles"), PathBuf::from("/abs/tiles"));
    }
}
