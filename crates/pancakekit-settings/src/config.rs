//! Configuration for PancakeKit renders
//!
//! Provides the immutable-per-render [`RenderConfig`], the flood fill
//! options in [`FillToolConfig`], and file handling for both. Files are JSON
//! or TOML, picked by extension; every field has a default so partial files
//! load.
//!
//! Configuration is organized into logical sections:
//! - Machine geometry (print area in mm, editor view bounds in scene units)
//! - Deposition timing (start/end waits, pre-shutoff distance, shade change)
//! - Fill generation (line hatching vs. shape pocketing)
//! - Motion (base speed, per-shade speed table, mirroring, travel ordering)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use pancakekit_core::Shade;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Printable rectangle on the machine, in millimetres.
///
/// `x`/`l` are the left and right X bounds, `t`/`y` the top and bottom Y
/// bounds as the machine sees them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    pub x: f64,
    pub y: f64,
    pub l: f64,
    pub t: f64,
}

impl Default for PrintArea {
    fn default() -> Self {
        Self {
            x: 42.0,
            y: 210.0,
            l: 442.0,
            t: 0.0,
        }
    }
}

impl PrintArea {
    pub fn width(&self) -> f64 {
        (self.l - self.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y - self.t).abs()
    }
}

/// Editor view bounds that map onto the print area, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            x: 0.0,
            width: 800.0,
            height: 420.0,
        }
    }
}

/// Settings for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Machine print area (mm)
    pub print_area: PrintArea,
    /// Scene-space view bounds mapped onto the print area
    pub view: ViewBounds,
    /// Curve flattening tolerance (scene units)
    pub flatten_resolution: f64,
    /// Arc-length before a path end at which the pump is shut off
    pub line_end_pre_shutoff: f64,
    /// Dwell after pump on (ms)
    pub start_wait: u32,
    /// Dwell at the end of each path (ms)
    pub end_wait: u32,
    /// Wait after a bottle change (seconds)
    pub shade_change_wait: f64,
    /// Hatch fills instead of pocket fills
    pub use_line_fill: bool,
    /// Distance between hatch lines (scene units)
    pub fill_spacing: f64,
    /// Hatch angle (degrees)
    pub fill_angle: f64,
    /// Pocket fill tool width (mm)
    pub shape_fill_width: f64,
    /// Base feed speed
    pub bot_speed: u32,
    /// Switch speed per shade
    pub use_shade_speed: bool,
    /// Speed per shade, indexed by shade
    pub shade_speeds: [u32; 4],
    /// Mirror the X axis on output
    pub flip_output: bool,
    /// Reorder paths to minimize travel
    pub optimize_travel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            print_area: PrintArea::default(),
            view: ViewBounds::default(),
            flatten_resolution: 0.5,
            line_end_pre_shutoff: 20.0,
            start_wait: 450,
            end_wait: 250,
            shade_change_wait: 15.0,
            use_line_fill: false,
            fill_spacing: 10.0,
            fill_angle: 23.0,
            shape_fill_width: 3.0,
            bot_speed: 6000,
            use_shade_speed: false,
            shade_speeds: [6000; 4],
            flip_output: false,
            optimize_travel: true,
        }
    }
}

/// Rejects NaN and infinities before any range check sees them.
fn ensure_finite(values: &[(&str, f64)]) -> SettingsResult<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((key, value)) => Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

impl RenderConfig {
    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        ensure_finite(&[
            ("print_area.x", self.print_area.x),
            ("print_area.y", self.print_area.y),
            ("print_area.l", self.print_area.l),
            ("print_area.t", self.print_area.t),
            ("view.x", self.view.x),
            ("view.width", self.view.width),
            ("view.height", self.view.height),
            ("flatten_resolution", self.flatten_resolution),
            ("line_end_pre_shutoff", self.line_end_pre_shutoff),
            ("shade_change_wait", self.shade_change_wait),
            ("fill_spacing", self.fill_spacing),
            ("fill_angle", self.fill_angle),
            ("shape_fill_width", self.shape_fill_width),
        ])?;
        if self.view.width <= 0.0 || self.view.height <= 0.0 {
            return Err(SettingsError::invalid("view", "dimensions must be > 0"));
        }
        if self.print_area.width() <= 0.0 || self.print_area.height() <= 0.0 {
            return Err(SettingsError::invalid("print_area", "dimensions must be > 0"));
        }
        if self.flatten_resolution <= 0.0 {
            return Err(SettingsError::invalid("flatten_resolution", "must be > 0"));
        }
        if self.line_end_pre_shutoff < 0.0 {
            return Err(SettingsError::invalid("line_end_pre_shutoff", "must be >= 0"));
        }
        if self.shade_change_wait < 0.0 {
            return Err(SettingsError::invalid("shade_change_wait", "must be >= 0"));
        }
        if self.fill_spacing <= 0.0 {
            return Err(SettingsError::invalid("fill_spacing", "must be > 0"));
        }
        if self.shape_fill_width <= 0.0 {
            return Err(SettingsError::invalid("shape_fill_width", "must be > 0"));
        }
        if self.bot_speed == 0 {
            return Err(SettingsError::invalid("bot_speed", "must be > 0"));
        }
        Ok(())
    }

    /// Converts millimetres on the machine into scene units.
    pub fn mm_to_scene(&self, mm: f64) -> f64 {
        mm * self.view.width / self.print_area.width()
    }

    pub fn shade_speed(&self, shade: Shade) -> u32 {
        self.shade_speeds[shade.index()]
    }

    /// Shade-change wait in whole milliseconds.
    pub fn shade_change_wait_ms(&self) -> u64 {
        (self.shade_change_wait * 1000.0).round() as u64
    }

    /// Every setting as `(key, value)`, nested keys dotted, sorted by key.
    pub fn summary(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(value) = serde_json::to_value(self) {
            flatten_value("", &value, &mut out);
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

fn flatten_value(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(&name, child, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

/// Options for the interactive flood fill tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillToolConfig {
    /// Alpha at or above which a sampled cell counts as ink (0-255)
    pub alpha_threshold: u8,
    /// Raster cells per scene unit
    pub resolution: f64,
    /// Stroke width used when rasterizing open paths (scene units)
    pub stroke_width: f64,
    /// Gap that splits boundary points into separate loops (scene units)
    pub island_distance: f64,
    /// Loops above this area use the coarse tolerance (scene units squared)
    pub large_loop_area: f64,
    /// Simplification tolerance for large loops
    pub coarse_tolerance: f64,
    /// Simplification tolerance for small loops
    pub fine_tolerance: f64,
}

impl Default for FillToolConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 150,
            resolution: 1.0,
            stroke_width: 4.0,
            island_distance: 10.0,
            large_loop_area: 400.0,
            coarse_tolerance: 2.0,
            fine_tolerance: 0.5,
        }
    }
}

impl FillToolConfig {
    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        ensure_finite(&[
            ("resolution", self.resolution),
            ("stroke_width", self.stroke_width),
            ("island_distance", self.island_distance),
            ("large_loop_area", self.large_loop_area),
            ("coarse_tolerance", self.coarse_tolerance),
            ("fine_tolerance", self.fine_tolerance),
        ])?;
        if self.alpha_threshold == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "alpha_threshold".to_string(),
                value: self.alpha_threshold.to_string(),
            }
            .into());
        }
        if self.resolution <= 0.0 {
            return Err(SettingsError::invalid("resolution", "must be > 0"));
        }
        if self.island_distance <= 0.0 {
            return Err(SettingsError::invalid("island_distance", "must be > 0"));
        }
        if self.coarse_tolerance < 0.0 || self.fine_tolerance < 0.0 {
            return Err(SettingsError::invalid("tolerance", "must be >= 0"));
        }
        Ok(())
    }
}

/// Complete configuration file
///
/// Aggregates the render and fill tool sections and provides file I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub fill_tool: FillToolConfig,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            self.to_toml()?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.render.validate()?;
        self.fill_tool.validate()
    }
}
