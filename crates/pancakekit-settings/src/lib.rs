//! # PancakeKit Settings
//!
//! Render and fill tool configuration with JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::{Config, FillToolConfig, PrintArea, RenderConfig, ViewBounds};
pub use error::{ConfigError, SettingsError, SettingsResult};
