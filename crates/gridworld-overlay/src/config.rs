//! Configuration loading and typed config structures for the overlay.
//!
//! The canonical configuration lives in `gridworld-config.yaml`. Every
//! section and field has a default, so an empty or partial file is valid.
//! Styling is read once and stays fixed for the lifetime of the lattice
//! generator and reconciler built from it.

use std::path::Path;

use gridworld_types::GeoPoint;
use serde::Deserialize;

use crate::mount::{self, MountError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A mount parameter override could not be parsed.
    #[error("invalid mount override: {source}")]
    Mount {
        /// The underlying mount parameter error.
        #[from]
        source: MountError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level overlay configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverlayConfig {
    /// Initial map placement.
    #[serde(default)]
    pub map: MapConfig,

    /// Lattice line styling.
    #[serde(default)]
    pub lattice: LatticeStyle,

    /// PAC marker styling.
    #[serde(default)]
    pub markers: MarkerStyle,

    /// Reconciliation strategy.
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OverlayConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override the mount parameters:
    /// - `GRIDWORLD_REGION` overrides `map.region`
    /// - `GRIDWORLD_CENTER` (JSON `{"lat":..,"lng":..}`) overrides `map.center`
    /// - `GRIDWORLD_ZOOM` overrides `map.zoom`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Mount`] if an override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.map.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Initial map placement, mirroring the host element's mount attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Region the map opens on.
    #[serde(default = "default_region")]
    pub region: String,

    /// Initial center.
    #[serde(default)]
    pub center: GeoPoint,

    /// Initial zoom level.
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Viewport width in pixels, used to derive headless bounds.
    #[serde(default = "default_width_px")]
    pub width_px: u32,

    /// Viewport height in pixels, used to derive headless bounds.
    #[serde(default = "default_height_px")]
    pub height_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            center: GeoPoint::default(),
            zoom: default_zoom(),
            width_px: default_width_px(),
            height_px: default_height_px(),
        }
    }
}

impl MapConfig {
    fn apply_env_overrides(&mut self) -> Result<(), MountError> {
        if let Ok(region) = std::env::var("GRIDWORLD_REGION") {
            self.region = mount::parse_region(&region)?;
        }
        if let Ok(center) = std::env::var("GRIDWORLD_CENTER") {
            self.center = mount::parse_center(&center)?;
        }
        if let Ok(zoom) = std::env::var("GRIDWORLD_ZOOM") {
            self.zoom = mount::parse_zoom(&zoom)?;
        }
        Ok(())
    }
}

/// Stroke styling shared by every lattice line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatticeStyle {
    /// Stroke color as `#rrggbb`.
    #[serde(default = "default_lattice_color")]
    pub stroke_color: String,

    /// Stroke opacity, 0 to 1.
    #[serde(default = "default_lattice_opacity")]
    pub stroke_opacity: f64,

    /// Stroke weight in pixels.
    #[serde(default = "default_lattice_weight")]
    pub stroke_weight: f64,

    /// Draw lines along great circles.
    #[serde(default = "default_true")]
    pub geodesic: bool,
}

impl Default for LatticeStyle {
    fn default() -> Self {
        Self {
            stroke_color: default_lattice_color(),
            stroke_opacity: default_lattice_opacity(),
            stroke_weight: default_lattice_weight(),
            geodesic: true,
        }
    }
}

/// Circle-symbol styling for PAC markers. The fill color comes from the
/// region palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkerStyle {
    /// Symbol radius in pixels.
    #[serde(default = "default_marker_scale")]
    pub scale: f64,

    /// Fill opacity, 0 to 1.
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,

    /// Outline color as `#rrggbb`.
    #[serde(default = "default_marker_stroke")]
    pub stroke_color: String,

    /// Outline weight in pixels.
    #[serde(default = "default_marker_stroke_weight")]
    pub stroke_weight: f64,

    /// Number of identifier characters shown in the marker label.
    #[serde(default = "default_label_prefix_len")]
    pub label_prefix_len: usize,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            scale: default_marker_scale(),
            fill_opacity: default_fill_opacity(),
            stroke_color: default_marker_stroke(),
            stroke_weight: default_marker_stroke_weight(),
            label_prefix_len: default_label_prefix_len(),
        }
    }
}

/// How a snapshot is applied to the existing handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Destroy every handle, then create one per entity.
    #[default]
    FullReplace,
    /// Update kept ids in place, create new ids, destroy missing ids.
    Incremental,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ReconcileConfig {
    /// Strategy for applying snapshots.
    #[serde(default)]
    pub mode: ReconcileMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_region() -> String {
    "global_grid".to_owned()
}

const fn default_zoom() -> u8 {
    3
}

const fn default_width_px() -> u32 {
    1024
}

const fn default_height_px() -> u32 {
    768
}

fn default_lattice_color() -> String {
    "#3b82f6".to_owned()
}

const fn default_lattice_opacity() -> f64 {
    0.3
}

const fn default_lattice_weight() -> f64 {
    1.0
}

const fn default_marker_scale() -> f64 {
    12.0
}

const fn default_fill_opacity() -> f64 {
    0.8
}

fn default_marker_stroke() -> String {
    "#ffffff".to_owned()
}

const fn default_marker_stroke_weight() -> f64 {
    2.0
}

const fn default_label_prefix_len() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
