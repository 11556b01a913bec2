//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[tiles]
; Directory holding SRTM elevation tiles named like N38W077.hgt
directory = {}
; Tile resolution: srtm1 (1 arc-second, 3601 samples) or srtm3 (3 arc-second, 1201 samples)
resolution = {}

[observer]
; Eye height above ground, in metres
height = {}
; View radius in grid cells (must be smaller than one tile)
radius = {}

[viewshed]
; Lower distant terrain to account for Earth's curvature
curvature_correction = {}
; Worker threads for the sweep (0 = one per CPU core)
workers = {}

[cluster]
; Seconds to wait for peers before reporting their batches as failed
peer_timeout_secs = {}
; Number of in-process peers to simulate
simulated_peers = {}

[logging]
; Log file, cleared at the start of each session
file = {}
"#,
        path_to_string(&config.tiles.directory),
        config.tiles.resolution,
        config.observer.height,
        config.observer.radius,
        config.viewshed.curvature_correction,
        config.viewshed.workers,
        config.cluster.peer_timeout_secs,
        config.cluster.simulated_peers,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
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
    use super::super::settings::ConfigFile;
    use crate::hgt::Resolution;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.tiles.directory = PathBuf::from("/srv/srtm");
        config.tiles.resolution = Resolution::SRTM1;
        config.observer.height = 12.5;
        config.observer.radius = 2000;
        config.viewshed.curvature_correction = true;
        config.cluster.simulated_peers = 3;

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_written_with_comments() {
        let content = super::to_config_string(&ConfigFile::default());
        assert!(content.contains("[tiles]"));
        assert!(content.contains("resolution = srtm3"));
        assert!(content.contains("; View radius"));
    }
}
