//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ti_core::{ListGeometry, TrackerConfig};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of empty activities created at startup.
    pub initial_rows: usize,

    /// How often the running activity is credited, in milliseconds.
    pub tick_interval_ms: u64,

    /// Row height used to map pointer positions to rows.
    pub row_height: f64,

    /// Gap between rows.
    pub row_spacing: f64,

    /// Y coordinate of the first row's top edge.
    pub list_top: f64,
}

impl Default for Config {
    fn default() -> Self {
        let geometry = ListGeometry::default();
        Self {
            initial_rows: TrackerConfig::default().initial_rows,
            tick_interval_ms: 500,
            row_height: geometry.row_height,
            row_spacing: geometry.spacing,
            list_top: geometry.top,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TI_*)
        figment = figment.merge(Env::prefixed("TI_"));

        figment.extract()
    }

    pub const fn geometry(&self) -> ListGeometry {
        ListGeometry {
            top: self.list_top,
            row_height: self.row_height,
            spacing: self.row_spacing,
        }
    }

    pub const fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            initial_rows: self.initial_rows,
            geometry: self.geometry(),
        }
    }
}

/// Returns the platform-specific config directory for ti.
///
/// On Linux: `~/.config/ti`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ti"))
}
