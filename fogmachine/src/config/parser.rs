//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::grid::max_radius;
use crate::hgt::Resolution;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.tiles.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("resolution") {
            config.tiles.resolution =
                Resolution::from_str(v.trim()).map_err(|_| ConfigFileError::InvalidValue {
                    section: "tiles".to_string(),
                    key: "resolution".to_string(),
                    value: v.to_string(),
                    reason: "must be one of: srtm1, srtm3".to_string(),
                })?;
        }
    }

    // [observer] section
    if let Some(section) = ini.section(Some("observer")) {
        if let Some(v) = section.get("height") {
            config.observer.height = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|h| h.is_finite() && *h >= 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "observer".to_string(),
                    key: "height".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative number of metres".to_string(),
                })?;
        }
        if let Some(v) = section.get("radius") {
            config.observer.radius =
                v.trim()
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "observer".to_string(),
                        key: "radius".to_string(),
                        value: v.to_string(),
                        reason: "must be a positive integer (cells)".to_string(),
                    })?;
        }
    }

    // Checked after both sections since the limit depends on the resolution.
    let limit = max_radius(config.tiles.resolution);
    if config.observer.radius > limit {
        return Err(ConfigFileError::InvalidValue {
            section: "observer".to_string(),
            key: "radius".to_string(),
            value: config.observer.radius.to_string(),
            reason: format!("must not exceed {} at {}", limit, config.tiles.resolution),
        });
    }

    // [viewshed] section
    if let Some(section) = ini.section(Some("viewshed")) {
        if let Some(v) = section.get("curvature_correction") {
            config.viewshed.curvature_correction = parse_bool(v);
        }
        if let Some(v) = section.get("workers") {
            config.viewshed.workers =
                v.trim()
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "viewshed".to_string(),
                        key: "workers".to_string(),
                        value: v.to_string(),
                        reason: "must be a non-negative integer (0 = one per core)".to_string(),
                    })?;
        }
    }

    // [cluster] section
    if let Some(section) = ini.section(Some("cluster")) {
        if let Some(v) = section.get("peer_timeout_secs") {
            config.cluster.peer_timeout_secs = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "cluster".to_string(),
                    key: "peer_timeout_secs".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (seconds)".to_string(),
                })?;
        }
        if let Some(v) = section.get("simulated_peers") {
            config.cluster.simulated_peers =
                v.trim()
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "cluster".to_string(),
                        key: "simulated_peers".to_string(),
                        value: v.to_string(),
                        reason: "must be a non-negative integer".to_string(),
                    })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
