//! End-to-end render: layer in, printer script out.
//!
//! Works on a private copy of the layer:
//! prune -> convert fills -> normalize -> optimize -> emit.

use crate::emitter::{Emission, Emitter};
use crate::error::CamToolResult;
use pancakekit_core::Layer;
use pancakekit_designer::{convert_fills, normalize, optimize, prune_degenerate};
use pancakekit_settings::RenderConfig;
use serde::Serialize;
use std::path::Path as FsPath;

/// Counters collected during one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderStats {
    /// Paths in the source layer
    pub input_paths: usize,
    /// Fill regions dropped as too small
    pub fills_dropped: usize,
    /// Simple paths after fill conversion and normalization
    pub normalized_paths: usize,
    /// Paths drawn after joins
    pub drawn_paths: usize,
    /// Paths skipped by the emitter
    pub skipped_paths: usize,
    pub shade_groups: usize,
    pub shade_changes: usize,
    /// Deposition distance in scene units
    pub draw_distance: f64,
    /// Pen-up distance in scene units
    pub travel_distance: f64,
    pub move_commands: usize,
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub gcode: String,
    pub stats: RenderStats,
}

/// Renders `layer` into a printer script.
pub fn render(layer: &Layer, config: &RenderConfig) -> CamToolResult<String> {
    Ok(render_with_stats(layer, config)?.gcode)
}

/// Renders `layer` and reports what happened along the way.
pub fn render_with_stats(layer: &Layer, config: &RenderConfig) -> CamToolResult<RenderOutput> {
    config.validate()?;

    let pruned = prune_degenerate(layer);
    let (filled, fills_dropped) = convert_fills(&pruned, config);
    let normalized = normalize(&filled);
    let normalized_paths = normalized.len();
    let ordered = optimize(normalized.paths, config.optimize_travel);

    let emission: Emission = Emitter::new(config).emit(&ordered);

    let stats = RenderStats {
        input_paths: layer.paths().len(),
        fills_dropped,
        normalized_paths,
        drawn_paths: ordered.path_count(),
        skipped_paths: emission.paths_skipped,
        shade_groups: ordered.groups.len(),
        shade_changes: emission.shade_changes,
        draw_distance: emission.draw_distance,
        travel_distance: ordered.travel_distance(),
        move_commands: emission.move_count(),
    };
    tracing::info!(
        "Rendered {} paths in {} shades: {:.1} draw, {:.1} travel, {} moves",
        stats.drawn_paths,
        stats.shade_groups,
        stats.draw_distance,
        stats.travel_distance,
        stats.move_commands
    );

    Ok(RenderOutput {
        gcode: emission.script(),
        stats,
    })
}

/// Renders `layer` and writes the script to `path`.
pub fn render_to_file(
    layer: &Layer,
    config: &RenderConfig,
    path: &FsPath,
) -> CamToolResult<RenderStats> {
    let output = render_with_stats(layer, config)?;
    std::fs::write(path, &output.gcode)?;
    tracing::info!("Wrote {}", path.display());
    Ok(output.stats)
}
