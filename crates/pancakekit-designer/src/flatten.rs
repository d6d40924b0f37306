//! Curve flattening through lyon.
//!
//! Handles on [`Segment`] are stored relative to their vertex, so the cubic
//! between two vertices uses `a.point + a.handle_out` and
//! `b.point + b.handle_in` as control points.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::Event;
use pancakekit_core::{Path, Point, Segment};

fn lyon_point(p: Point) -> lyon::math::Point {
    point(p.x as f32, p.y as f32)
}

fn is_curve(from: &Segment, to: &Segment) -> bool {
    from.handle_out.is_some_and(|h| h.x != 0.0 || h.y != 0.0)
        || to.handle_in.is_some_and(|h| h.x != 0.0 || h.y != 0.0)
}

fn control_points(from: &Segment, to: &Segment) -> (Point, Point) {
    let out = from.handle_out.unwrap_or_default();
    let inn = to.handle_in.unwrap_or_default();
    (
        from.point.offset(out.x, out.y),
        to.point.offset(inn.x, inn.y),
    )
}

/// Builds a lyon path from a drawing path, cubic where handles bend it.
pub fn to_lyon_path(path: &Path) -> lyon::path::Path {
    let mut builder = lyon::path::Path::builder();
    let Some(first) = path.segments.first() else {
        return builder.build();
    };
    builder.begin(lyon_point(first.point));

    let mut edge = |from: &Segment, to: &Segment| {
        if is_curve(from, to) {
            let (c1, c2) = control_points(from, to);
            builder.cubic_bezier_to(lyon_point(c1), lyon_point(c2), lyon_point(to.point));
        } else {
            builder.line_to(lyon_point(to.point));
        }
    };
    for pair in path.segments.windows(2) {
        edge(&pair[0], &pair[1]);
    }
    if path.closed && path.segments.len() > 1 {
        if let (Some(last), Some(first)) = (path.segments.last(), path.segments.first()) {
            edge(last, first);
        }
    }

    builder.end(path.closed);
    builder.build()
}

/// Polyline vertices of `path`. Paths without curves return their vertices
/// unchanged; curved paths are flattened at `tolerance`. A closed curved
/// path ends on a copy of its start.
pub fn flatten_points(path: &Path, tolerance: f64) -> Vec<Point> {
    if !path.has_curves() {
        return path.points();
    }

    let lyon_path = to_lyon_path(path);
    let mut points = Vec::new();
    for event in lyon_path.iter().flattened(tolerance.max(1e-3) as f32) {
        match event {
            Event::Begin { at } => points.push(Point::new(at.x as f64, at.y as f64)),
            Event::Line { to, .. } => points.push(Point::new(to.x as f64, to.y as f64)),
            Event::End {
                last, first, close, ..
            } => {
                if close && last != first {
                    points.push(Point::new(first.x as f64, first.y as f64));
                }
            }
            _ => {}
        }
    }
    points
}
