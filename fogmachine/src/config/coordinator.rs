//! Viewshed coordinator configuration.

use super::file::{DEFAULT_PEER_TIMEOUT_SECS, DEFAULT_RESOLUTION};
use crate::hgt::Resolution;
use crate::viewshed::SweepOptions;
use std::time::Duration;

/// Configuration for [`crate::node::NodeCoordinator`].
///
/// # Example
///
/// ```
/// use fogmachine::config::CoordinatorConfig;
/// use fogmachine::hgt::Resolution;
/// use std::time::Duration;
///
/// let config = CoordinatorConfig::new()
///     .with_resolution(Resolution::SRTM1)
///     .with_peer_timeout(Duration::from_secs(5));
/// assert_eq!(config.resolution(), Resolution::SRTM1);
/// assert!(!config.sweep_options().curvature_correction);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Resolution of the tiles in the local store
    resolution: Resolution,
    /// Deadline for all peer batches, measured from dispatch
    peer_timeout: Duration,
    /// Sweep tunables, forwarded to peers with every batch
    sweep: SweepOptions,
}

impl CoordinatorConfig {
    /// Create a new coordinator configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile resolution. Default: SRTM3.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set how long peers have to answer. Default: 30 seconds.
    pub fn with_peer_timeout(mut self, timeout: Duration) -> Self {
        self.peer_timeout = timeout;
        self
    }

    pub fn with_sweep_options(mut self, options: SweepOptions) -> Self {
        self.sweep = options;
        self
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn peer_timeout(&self) -> Duration {
        self.peer_timeout
    }

    pub fn sweep_options(&self) -> SweepOptions {
        self.sweep
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            peer_timeout: Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS),
            sweep: SweepOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(
            config.peer_timeout(),
            Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS)
        );
        assert_eq!(config.sweep_options(), SweepOptions::default());
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(CoordinatorConfig::new(), CoordinatorConfig::default());
    }

    #[test]
    fn test_builder_chain() {
        let config = CoordinatorConfig::new()
            .with_resolution(Resolution::SRTM1)
            .with_peer_timeout(Duration::from_millis(250))
            .with_sweep_options(SweepOptions::default().with_curvature_correction(true));

        assert_eq!(config.resolution(), Resolution::SRTM1);
        assert_eq!(config.peer_timeout(), Duration::from_millis(250));
        assert!(config.sweep_options().curvature_correction);
    }
}
