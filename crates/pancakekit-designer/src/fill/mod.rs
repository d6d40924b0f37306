//! Fill conversion.
//!
//! Filled regions are replaced by stroke paths before emission. Two
//! strategies are available, selected by `RenderConfig::use_line_fill`:
//!
//! - [`line_fill`]: boustrophedon hatching at the configured angle and spacing
//! - [`pocket`]: inset contours from `cavalier_contours` parallel offsets
//!
//! Strategy failures are local. [`convert_fill`] logs them and returns
//! `None`, and [`convert_fills`] drops the region from the working layer.

pub mod line_fill;
pub mod pocket;

use crate::flatten::flatten_points;
use pancakekit_core::{CompoundPath, GeometryError, Group, Layer, Node, NodeId, Path, Point, Shade};
use pancakekit_settings::RenderConfig;

pub use line_fill::line_fill;
pub use pocket::pocket_fill;

/// Regions smaller than this (scene units squared) are not filled.
pub const MIN_FILL_AREA: f64 = 1.0;

/// Stroke geometry produced for one filled region.
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutput {
    Path(Path),
    Compound { shade: Shade, paths: Vec<Path> },
}

impl FillOutput {
    /// Wraps strokes, collapsing a single stroke into a plain path.
    pub fn from_paths(mut paths: Vec<Path>, shade: Shade) -> Self {
        if paths.len() == 1 {
            if let Some(path) = paths.pop() {
                return FillOutput::Path(path);
            }
        }
        FillOutput::Compound { shade, paths }
    }

    pub fn paths(&self) -> &[Path] {
        match self {
            FillOutput::Path(path) => std::slice::from_ref(path),
            FillOutput::Compound { paths, .. } => paths,
        }
    }

    fn insert_into(self, layer: &mut Layer) -> NodeId {
        match self {
            FillOutput::Path(path) => layer.insert_path(path),
            FillOutput::Compound { shade, paths } => layer.insert_compound(paths, shade, false),
        }
    }
}

/// Rings of a fill region as polygons, with curves flattened.
pub fn region_rings(paths: &[&Path], tolerance: f64) -> Vec<Vec<Point>> {
    paths
        .iter()
        .map(|p| flatten_points(p, tolerance))
        .filter(|ring| ring.len() >= 3)
        .collect()
}

/// Runs the configured strategy on one region.
pub fn try_convert_fill(
    rings: &[Vec<Point>],
    shade: Shade,
    config: &RenderConfig,
) -> Result<FillOutput, GeometryError> {
    if config.use_line_fill {
        line_fill(rings, shade, config.fill_spacing, config.fill_angle)
    } else {
        pocket_fill(
            rings,
            shade,
            config.mm_to_scene(config.shape_fill_width),
            config.flatten_resolution,
        )
    }
}

/// Converts one filled region into strokes, or `None` when the region is
/// dropped.
pub fn convert_fill(paths: &[&Path], shade: Shade, config: &RenderConfig) -> Option<FillOutput> {
    let rings = region_rings(paths, config.flatten_resolution);
    match try_convert_fill(&rings, shade, config) {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::debug!("Dropping fill region: {}", e);
            None
        }
    }
}

/// Copy of `layer` with every fill path or compound replaced by strokes.
/// Returns the new layer and the number of regions dropped.
pub fn convert_fills(layer: &Layer, config: &RenderConfig) -> (Layer, usize) {
    let mut out = Layer::new();
    let mut dropped = 0;
    let mut visited = vec![false; layer.node_count()];
    for root in layer.roots() {
        if let Some(id) = copy_filled(layer, *root, config, &mut out, &mut dropped, &mut visited) {
            out.attach_root(id);
        }
    }
    if dropped > 0 {
        tracing::info!("Dropped {} fill regions too small to render", dropped);
    }
    (out, dropped)
}

fn copy_filled(
    src: &Layer,
    id: NodeId,
    config: &RenderConfig,
    dst: &mut Layer,
    dropped: &mut usize,
    visited: &mut [bool],
) -> Option<NodeId> {
    let node = src.get(id)?;
    if std::mem::replace(&mut visited[id.0], true) {
        return None;
    }
    match node {
        Node::Path(path) if path.is_fill => {
            let output = convert_fill(&[path], path.shade, config);
            if output.is_none() {
                *dropped += 1;
            }
            output.map(|o| o.insert_into(dst))
        }
        Node::Path(path) => Some(dst.insert_path(path.clone())),
        Node::Compound(compound) if compound.is_fill => {
            let rings = src.paths_of(id);
            let output = convert_fill(&rings, compound.shade, config);
            if output.is_none() {
                *dropped += 1;
            }
            output.map(|o| o.insert_into(dst))
        }
        Node::Compound(compound) => {
            let children: Vec<NodeId> = compound
                .children
                .iter()
                .filter_map(|c| copy_filled(src, *c, config, dst, dropped, visited))
                .collect();
            Some(dst.insert_node(Node::Compound(CompoundPath {
                children,
                shade: compound.shade,
                is_fill: false,
            })))
        }
        Node::Group(group) => {
            let children: Vec<NodeId> = group
                .children
                .iter()
                .filter_map(|c| copy_filled(src, *c, config, dst, dropped, visited))
                .collect();
            Some(dst.insert_node(Node::Group(Group { children })))
        }
    }
}
