//! Flood fill boundary extraction.
//!
//! The layer is sampled through a [`Rasterizer`] into a [`Grid`] of ink
//! cells. A 4-connected flood from the seed walks the empty cells and records
//! the midpoint of every empty-to-ink transition. Those points are chained
//! into loops by nearest neighbour, starting from the topmost point, and a
//! new loop begins whenever the next point is farther than the island
//! distance. Loops are simplified and returned as a fill path, or as a
//! compound fill when the region has holes.

use crate::rasterizer::{AlphaMask, Rasterizer};
use crate::simplify::simplify_loop;
use pancakekit_core::{FloodFillError, Layer, NodeId, Path, Point, Rect, Shade};
use pancakekit_settings::FillToolConfig;

/// Binary ink mask in raster cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    ink: Vec<bool>,
    origin: Point,
    cell_size: f64,
}

impl Grid {
    /// Cells with alpha at or above `threshold` are ink. Fails when the
    /// mask's samples do not cover `width * height` cells.
    pub fn from_alpha(mask: &AlphaMask, threshold: u8) -> Result<Self, FloodFillError> {
        let cells = mask.width.checked_mul(mask.height);
        if cells != Some(mask.alpha.len()) {
            return Err(FloodFillError::RasterizationFailure {
                reason: format!(
                    "mask has {} samples for {}x{} cells",
                    mask.alpha.len(),
                    mask.width,
                    mask.height
                ),
            });
        }
        if !(mask.resolution.is_finite() && mask.resolution > 0.0) {
            return Err(FloodFillError::RasterizationFailure {
                reason: format!("resolution {} must be positive", mask.resolution),
            });
        }
        Ok(Self {
            width: mask.width,
            height: mask.height,
            ink: mask.alpha.iter().map(|a| *a >= threshold).collect(),
            origin: Point::new(mask.region.min_x, mask.region.min_y),
            cell_size: 1.0 / mask.resolution,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.ink[y * self.width + x]
    }

    fn is_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Cell containing a scene point.
    pub fn cell_at(&self, p: &Point) -> Option<(usize, usize)> {
        let cx = ((p.x - self.origin.x) / self.cell_size).floor();
        let cy = ((p.y - self.origin.y) / self.cell_size).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.width as f64 || cy >= self.height as f64 {
            return None;
        }
        Some((cx as usize, cy as usize))
    }

    /// Scene position of a cell centre.
    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        Point::new(
            self.origin.x + (x as f64 + 0.5) * self.cell_size,
            self.origin.y + (y as f64 + 0.5) * self.cell_size,
        )
    }

    /// Floods the empty cells connected to `(x, y)` and returns the midpoints
    /// of every transition into ink.
    pub fn trace_boundary(&self, x: usize, y: usize) -> Result<Vec<Point>, FloodFillError> {
        let mut visited = vec![false; self.width * self.height];
        let mut stack = vec![(x, y)];
        visited[y * self.width + x] = true;
        let mut boundary = Vec::new();

        while let Some((cx, cy)) = stack.pop() {
            if self.is_edge(cx, cy) {
                return Err(FloodFillError::UnboundedFill);
            }
            let here = self.cell_center(cx, cy);
            let neighbours = [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)];
            for (nx, ny) in neighbours {
                if self.is_ink(nx, ny) {
                    boundary.push(here.lerp(&self.cell_center(nx, ny), 0.5));
                    continue;
                }
                let idx = ny * self.width + nx;
                if !visited[idx] {
                    visited[idx] = true;
                    stack.push((nx, ny));
                }
            }
        }
        Ok(boundary)
    }
}

/// Chains boundary points into loops by repeated nearest-neighbour search.
pub fn chain_loops(mut points: Vec<Point>, island_distance: f64) -> Vec<Vec<Point>> {
    let island_sq = island_distance * island_distance;
    let mut loops = Vec::new();

    while let Some(start) = topmost(&points) {
        let mut tip = points.swap_remove(start);
        let mut chain = vec![tip];
        loop {
            let Some((next, d)) = nearest(&points, &tip) else {
                break;
            };
            if d > island_sq {
                break;
            }
            tip = points.swap_remove(next);
            chain.push(tip);
        }
        loops.push(chain);
    }
    loops
}

fn topmost(points: &[Point]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
}

fn nearest(points: &[Point], from: &Point) -> Option<(usize, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance_sq(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Outcome of a flood fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FloodFillResult {
    /// The seed hit an existing fill region.
    Existing(NodeId),
    /// One closed fill path.
    Path(Path),
    /// Several closed loops forming one even-odd region.
    Compound { shade: Shade, paths: Vec<Path> },
}

impl FloodFillResult {
    /// Adds the new fill to `layer`. Existing regions are left in place.
    pub fn add_to(self, layer: &mut Layer) -> NodeId {
        match self {
            FloodFillResult::Existing(id) => id,
            FloodFillResult::Path(path) => layer.add_path(path),
            FloodFillResult::Compound { shade, paths } => layer.add_compound(paths, shade, true),
        }
    }
}

/// Builds fill geometry for the closed region around `seed`.
///
/// A seed inside an existing fill region returns that region without
/// sampling. Otherwise `region` is sampled at `config.resolution`.
pub fn flood_fill<R: Rasterizer>(
    seed: Point,
    layer: &Layer,
    rasterizer: &R,
    region: &Rect,
    shade: Shade,
    config: &FillToolConfig,
) -> Result<FloodFillResult, FloodFillError> {
    if let Some(existing) = layer.fill_regions_at(&seed).last() {
        tracing::debug!("Seed hit existing fill {:?}", existing);
        return Ok(FloodFillResult::Existing(*existing));
    }

    let mask = rasterizer.sample(region, config.resolution)?;
    let grid = Grid::from_alpha(&mask, config.alpha_threshold)?;
    let invalid = || FloodFillError::InvalidSeed {
        x: seed.x,
        y: seed.y,
    };
    let (sx, sy) = grid.cell_at(&seed).ok_or_else(invalid)?;
    if grid.is_ink(sx, sy) {
        return Err(invalid());
    }

    let boundary = grid.trace_boundary(sx, sy)?;
    let loops = chain_loops(boundary, config.island_distance);

    let mut paths = Vec::new();
    for ring in loops {
        let Some(bounds) = Rect::from_points(&ring) else {
            continue;
        };
        let area = bounds.area();
        if area <= 0.0 {
            continue;
        }
        let tolerance = if area > config.large_loop_area {
            config.coarse_tolerance
        } else {
            config.fine_tolerance
        };
        let simplified = simplify_loop(&ring, tolerance);
        paths.push(Path::polygon(&simplified, shade).with_fill(true));
    }

    tracing::debug!("Flood fill traced {} loops", paths.len());
    match paths.len() {
        0 => Err(FloodFillError::UnboundedFill),
        1 => Ok(FloodFillResult::Path(paths.remove(0))),
        _ => Ok(FloodFillResult::Compound { shade, paths }),
    }
}
