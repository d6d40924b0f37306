//! Layer rasterization for the flood fill tool.
//!
//! The [`Rasterizer`] trait is the seam between the boundary extractor and
//! whatever draws the layer. [`TinySkiaRasterizer`] draws a [`Layer`] with
//! tiny-skia: fill regions are filled even-odd and every path is stroked.

use pancakekit_core::{FloodFillError, Layer, Node, NodeId, Path, Rect};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Row-major alpha samples covering `region`, `resolution` cells per unit.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<u8>,
    pub region: Rect,
    pub resolution: f64,
}

impl AlphaMask {
    /// A fully transparent mask sized for `region`.
    pub fn blank(region: &Rect, resolution: f64) -> Self {
        let (width, height) = cell_dims(region, resolution);
        Self {
            width,
            height,
            alpha: vec![0; width * height],
            region: *region,
            resolution,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.alpha[y * self.width + x]
        } else {
            0
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.alpha[y * self.width + x] = value;
        }
    }
}

fn cell_dims(region: &Rect, resolution: f64) -> (usize, usize) {
    let w = (region.width() * resolution).ceil().max(0.0) as usize;
    let h = (region.height() * resolution).ceil().max(0.0) as usize;
    (w, h)
}

/// Samples drawn content into an alpha mask.
pub trait Rasterizer {
    fn sample(&self, region: &Rect, resolution: f64) -> Result<AlphaMask, FloodFillError>;
}

/// Draws a layer's paths with tiny-skia.
pub struct TinySkiaRasterizer<'a> {
    layer: &'a Layer,
    stroke_width: f64,
}

impl<'a> TinySkiaRasterizer<'a> {
    pub fn new(layer: &'a Layer, stroke_width: f64) -> Self {
        Self {
            layer,
            stroke_width,
        }
    }
}

/// Appends one contour to `pb`. Returns false for an empty path.
fn append_contour(pb: &mut PathBuilder, path: &Path) -> bool {
    let Some(first) = path.segments.first() else {
        return false;
    };
    pb.move_to(first.point.x as f32, first.point.y as f32);

    let mut edge = |from: &pancakekit_core::Segment, to: &pancakekit_core::Segment| {
        let out = from.handle_out.unwrap_or_default();
        let inn = to.handle_in.unwrap_or_default();
        if from.has_handles() || to.has_handles() {
            pb.cubic_to(
                (from.point.x + out.x) as f32,
                (from.point.y + out.y) as f32,
                (to.point.x + inn.x) as f32,
                (to.point.y + inn.y) as f32,
                to.point.x as f32,
                to.point.y as f32,
            );
        } else {
            pb.line_to(to.point.x as f32, to.point.y as f32);
        }
    };
    for pair in path.segments.windows(2) {
        edge(&pair[0], &pair[1]);
    }
    if path.closed {
        if let Some(last) = path.segments.last() {
            edge(last, first);
        }
        pb.close();
    }
    true
}

fn skia_path<'p>(paths: impl IntoIterator<Item = &'p Path>) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut any = false;
    for path in paths {
        any |= append_contour(&mut pb, path);
    }
    if any {
        pb.finish()
    } else {
        None
    }
}

/// Fill regions of a layer, one entry per region. A compound fill yields all
/// of its contours together so holes survive the even-odd fill.
fn fill_regions(layer: &Layer) -> Vec<Vec<&Path>> {
    let mut regions = Vec::new();
    let mut visited = vec![false; layer.node_count()];
    let mut stack: Vec<NodeId> = layer.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(node) = layer.get(id) else {
            continue;
        };
        if std::mem::replace(&mut visited[id.0], true) {
            continue;
        }
        match node {
            Node::Path(path) if path.is_fill => regions.push(vec![path]),
            Node::Path(_) => {}
            Node::Compound(compound) if compound.is_fill => regions.push(layer.paths_of(id)),
            other => stack.extend(other.children().iter().rev().copied()),
        }
    }
    regions
}

impl Rasterizer for TinySkiaRasterizer<'_> {
    fn sample(&self, region: &Rect, resolution: f64) -> Result<AlphaMask, FloodFillError> {
        if resolution <= 0.0 {
            return Err(FloodFillError::RasterizationFailure {
                reason: format!("resolution {} must be positive", resolution),
            });
        }
        let (width, height) = cell_dims(region, resolution);
        let Some(mut pixmap) = Pixmap::new(width as u32, height as u32) else {
            return Err(FloodFillError::RasterizationFailure {
                reason: format!("cannot allocate a {}x{} raster", width, height),
            });
        };

        let transform = Transform::from_translate(-region.min_x as f32, -region.min_y as f32)
            .post_scale(resolution as f32, resolution as f32);
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: self.stroke_width as f32,
            ..Default::default()
        };

        let mut filled = 0usize;
        for region in fill_regions(self.layer) {
            if let Some(skia) = skia_path(region) {
                pixmap.fill_path(&skia, &paint, FillRule::EvenOdd, transform, None);
                filled += 1;
            }
        }
        let mut stroked = 0usize;
        for (_, path) in self.layer.paths() {
            if let Some(skia) = skia_path([path]) {
                pixmap.stroke_path(&skia, &paint, &stroke, transform, None);
                stroked += 1;
            }
        }
        tracing::debug!(
            "Rasterized {} fills and {} outlines into {}x{} cells",
            filled,
            stroked,
            width,
            height
        );

        Ok(AlphaMask {
            width,
            height,
            alpha: pixmap.pixels().iter().map(|p| p.alpha()).collect(),
            region: *region,
            resolution,
        })
    }
}
