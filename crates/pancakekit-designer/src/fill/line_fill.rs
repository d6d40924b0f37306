//! Hatch fill.
//!
//! The region is rotated so hatch lines run along X, scanned at `spacing`
//! intervals with an even-odd crossing rule, and rotated back. Odd lines are
//! emitted right-to-left, and in reverse segment order, so consecutive
//! strokes start near where the previous one ended.

use super::{FillOutput, MIN_FILL_AREA};
use pancakekit_core::geometry::{region_area, rotate_point};
use pancakekit_core::{GeometryError, Path, Point, Rect, Shade};
use smallvec::SmallVec;

/// Hatches `rings` (outer loops and holes, even-odd) with parallel strokes.
pub fn line_fill(
    rings: &[Vec<Point>],
    shade: Shade,
    spacing: f64,
    angle: f64,
) -> Result<FillOutput, GeometryError> {
    if spacing <= 0.0 {
        return Err(GeometryError::degenerate("fill spacing must be positive"));
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
    let center = bounds.center();

    let rotated: Vec<Vec<Point>> = rings
        .iter()
        .map(|ring| ring.iter().map(|p| rotate_point(*p, center, -angle)).collect())
        .collect();
    let Some(rbounds) = Rect::from_points(rotated.iter().flatten()) else {
        return Err(GeometryError::degenerate("region has no vertices"));
    };

    let mut strokes = Vec::new();
    let mut y = rbounds.min_y + spacing / 2.0;
    let mut forward = true;
    while y <= rbounds.max_y {
        let mut crossings = scanline_crossings(&rotated, y);
        crossings.sort_by(|a, b| a.total_cmp(b));

        let mut segments: SmallVec<[(f64, f64); 8]> = crossings
            .chunks_exact(2)
            .filter(|pair| pair[1] - pair[0] > 1e-9)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        if !forward {
            segments.reverse();
        }
        for (x0, x1) in segments {
            let (from, to) = if forward { (x0, x1) } else { (x1, x0) };
            let a = rotate_point(Point::new(from, y), center, angle);
            let b = rotate_point(Point::new(to, y), center, angle);
            strokes.push(Path::polyline(&[a, b], shade));
        }

        forward = !forward;
        y += spacing;
    }

    if strokes.is_empty() {
        return Err(GeometryError::degenerate("no hatch line crosses the region"));
    }
    tracing::debug!(
        "Line fill produced {} strokes at {:.1} deg, spacing {:.2}",
        strokes.len(),
        angle,
        spacing
    );
    Ok(FillOutput::from_paths(strokes, shade))
}

fn scanline_crossings(rings: &[Vec<Point>], y: f64) -> SmallVec<[f64; 16]> {
    let mut xs = SmallVec::new();
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let p1 = ring[i];
            let p2 = ring[(i + 1) % n];
            if (p1.y <= y && p2.y > y) || (p2.y <= y && p1.y > y) {
                xs.push(p1.x + (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y));
            }
        }
    }
    xs
}
