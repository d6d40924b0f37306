//! Pocket fill from inset contours.
//!
//! The region is quantized onto a 1/1000 grid relative to its bounding box
//! origin, oriented for `cavalier_contours` (outer loops counter-clockwise,
//! holes clockwise) and offset inward by half the tool width, then by whole
//! tool widths until nothing is left. Arc segments in the offsets are
//! subdivided to the flattening tolerance and the results are translated
//! back to the region's position.

use super::{FillOutput, MIN_FILL_AREA};
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use cavalier_contours::shape_algorithms::{Shape, ShapeOffsetOptions};
use pancakekit_core::geometry::{nesting_depths, region_area, signed_area};
use pancakekit_core::{GeometryError, Path, Point, Rect, Shade};
use std::panic::{self, AssertUnwindSafe};

const QUANTUM: f64 = 1000.0;
const MAX_PASSES: usize = 1000;

fn quantize(v: f64) -> f64 {
    (v * QUANTUM).round() / QUANTUM
}

/// Removes repeated vertices and a trailing copy of the first vertex.
fn prepare_ring(ring: &[Point], origin: Point) -> Vec<Point> {
    let mut clean: Vec<Point> = Vec::with_capacity(ring.len());
    for p in ring {
        let q = Point::new(quantize(p.x - origin.x), quantize(p.y - origin.y));
        if clean.last().is_none_or(|last| last.distance_to(&q) > 1e-9) {
            clean.push(q);
        }
    }
    while clean.len() > 1 && clean[0].distance_to(&clean[clean.len() - 1]) <= 1e-9 {
        clean.pop();
    }
    clean
}

fn to_polyline(ring: &[Point], counter_clockwise: bool) -> Polyline<f64> {
    let mut pline = Polyline::new();
    let reverse = (signed_area(ring) > 0.0) != counter_clockwise;
    let mut push = |p: &Point| pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    if reverse {
        ring.iter().rev().for_each(&mut push);
    } else {
        ring.iter().for_each(&mut push);
    }
    pline.set_is_closed(true);
    pline
}

fn offset_shape(shape: &Shape<f64>, offset: f64) -> Result<Shape<f64>, GeometryError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        shape.parallel_offset(offset, ShapeOffsetOptions::default())
    }))
    .map_err(|_| GeometryError::clipping(format!("offset at {:.3} panicked", offset)))
}

/// Points strictly between `from` and `to` along the arc with the given
/// bulge, spaced so no chord strays more than `tolerance` from the arc.
fn arc_points(from: Point, to: Point, bulge: f64, tolerance: f64) -> Vec<Point> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let chord = (dx * dx + dy * dy).sqrt();
    if bulge.abs() < 1e-9 || chord < 1e-9 {
        return Vec::new();
    }
    let sweep = 4.0 * bulge.atan();
    let radius = chord * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
    let k = (1.0 - bulge * bulge) / (4.0 * bulge);
    let center = Point::new(
        (from.x + to.x) / 2.0 - k * dy,
        (from.y + to.y) / 2.0 + k * dx,
    );

    let step = 2.0 * (1.0 - tolerance / radius).clamp(-1.0, 1.0).acos();
    let count = if step > 1e-9 {
        ((sweep.abs() / step).ceil() as usize).clamp(1, 1024)
    } else {
        1
    };
    let start = (from.y - center.y).atan2(from.x - center.x);
    (1..count)
        .map(|i| {
            let angle = start + sweep * i as f64 / count as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Closed contour of a cavalier polyline with arcs subdivided.
fn contour_points(pline: &Polyline<f64>, origin: Point, tolerance: f64) -> Vec<Point> {
    let vertices = &pline.vertex_data;
    let mut points = Vec::with_capacity(vertices.len());
    for (i, v) in vertices.iter().enumerate() {
        let from = Point::new(v.x, v.y);
        points.push(from);
        let next = if i + 1 < vertices.len() {
            &vertices[i + 1]
        } else if pline.is_closed() {
            &vertices[0]
        } else {
            continue;
        };
        points.extend(arc_points(from, Point::new(next.x, next.y), v.bulge, tolerance));
    }
    points
        .into_iter()
        .map(|p| Point::new(p.x + origin.x, p.y + origin.y))
        .collect()
}

/// Covers `rings` (outer loops and holes, even-odd) with inset contours of a
/// tool `tool_width` scene units wide. Arcs in the offsets are flattened to
/// `tolerance`.
pub fn pocket_fill(
    rings: &[Vec<Point>],
    shade: Shade,
    tool_width: f64,
    tolerance: f64,
) -> Result<FillOutput, GeometryError> {
    if tool_width <= 0.0 {
        return Err(GeometryError::degenerate("tool width must be positive"));
    }
    let area = region_area(rings);
    if area < MIN_FILL_AREA {
        return Err(GeometryError::degenerate(format!(
            "region area {:.3} below minimum",
            area
        )));
    }
    let Some(bounds) = Rect::from_points(rings.iter().flatten()) else {
        return Err(GeometryError::degenerate("region has no vertices"));
    };
    let origin = Point::new(bounds.min_x, bounds.min_y);

    let prepared: Vec<Vec<Point>> = rings
        .iter()
        .map(|r| prepare_ring(r, origin))
        .filter(|r| r.len() >= 3)
        .collect();
    let depths = nesting_depths(&prepared);
    let plines = prepared
        .iter()
        .zip(depths)
        .map(|(ring, depth)| to_polyline(ring, depth % 2 == 0));
    let shape = Shape::from_plines(plines);

    let mut contours = Vec::new();
    for pass in 0..MAX_PASSES {
        let offset = tool_width / 2.0 + pass as f64 * tool_width;
        let inset = offset_shape(&shape, offset)?;
        let before = contours.len();
        for indexed in inset.ccw_plines.iter().chain(inset.cw_plines.iter()) {
            let points = contour_points(&indexed.polyline, origin, tolerance);
            if points.len() >= 2 {
                contours.push(Path::polygon(&points, shade));
            }
        }
        if contours.len() == before {
            break;
        }
    }

    if contours.is_empty() {
        return Err(GeometryError::clipping(format!(
            "no inset at {:.3} for a {:.3} x {:.3} region",
            tool_width / 2.0,
            bounds.width(),
            bounds.height()
        )));
    }
    tracing::debug!(
        "Pocket fill produced {} contours with tool width {:.3}",
        contours.len(),
        tool_width
    );
    Ok(FillOutput::from_paths(contours, shade))
}
