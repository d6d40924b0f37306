//! # PancakeKit
//!
//! Turns a shaded vector drawing into a script for a pancake printer.
//!
//! ## Architecture
//!
//! PancakeKit is organized as a workspace with multiple crates:
//!
//! 1. **pancakekit-core** - Geometry, paths, the layer arena, error types
//! 2. **pancakekit-settings** - Render and fill tool configuration
//! 3. **pancakekit-designer** - Fills, normalization, travel ordering, flood fill
//! 4. **pancakekit-camtools** - Coordinate mapping and G-code emission
//! 5. **pancakekit** - This crate: re-exports, logging and the CLI

pub use pancakekit_camtools as camtools;
pub use pancakekit_designer as designer;
pub use pancakekit_settings as settings;

pub use pancakekit_camtools::{render, render_to_file, render_with_stats, RenderStats};
pub use pancakekit_core::{Error, Layer, Path, Point, Rect, Result, Shade};
pub use pancakekit_designer::{flood_fill, FloodFillResult, TinySkiaRasterizer};
pub use pancakekit_settings::{Config, FillToolConfig, RenderConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so scripts written to stdout stay clean
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
