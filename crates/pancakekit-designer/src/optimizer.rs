//! Travel-order optimization.
//!
//! Paths are split into color groups, darkest shade first. Inside a group a
//! greedy nearest-endpoint walk picks the next path from a cursor that starts
//! at the origin. A path whose nearer endpoint is its end is reversed. When
//! the cursor sits within [`JOIN_THRESHOLD`] of the chosen start, the path is
//! appended to the previous one instead of costing another travel move.
//!
//! Ties between equally near endpoints go to the lowest path index, and a
//! path's start wins over its own end.

use pancakekit_core::{Path, Point, Shade};
use serde::Serialize;

/// Endpoint distance below which consecutive paths are merged.
pub const JOIN_THRESHOLD: f64 = 7.0;

/// One drawn path and the indices of the input paths it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedPath {
    pub path: Path,
    pub sources: Vec<usize>,
}

/// Paths of a single shade in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorGroup {
    pub shade: Shade,
    pub paths: Vec<OrderedPath>,
}

/// Non-empty color groups, darkest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderedLayer {
    pub groups: Vec<ColorGroup>,
}

impl OrderedLayer {
    /// Number of drawn paths after joins.
    pub fn path_count(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len()).sum()
    }

    /// Number of input paths represented.
    pub fn source_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.paths)
            .map(|p| p.sources.len())
            .sum()
    }

    /// Pen-up distance, each group starting from the origin.
    pub fn travel_distance(&self) -> f64 {
        let mut total = 0.0;
        for group in &self.groups {
            let mut cursor = Point::default();
            for ordered in &group.paths {
                if let (Some(start), Some(end)) =
                    (ordered.path.first_point(), ordered.path.last_point())
                {
                    total += cursor.distance_to(&start);
                    cursor = end;
                }
            }
        }
        total
    }
}

/// Orders normalized paths into color groups. With `optimize_travel` off,
/// paths keep their input order within each group and nothing is joined.
pub fn optimize(paths: Vec<Path>, optimize_travel: bool) -> OrderedLayer {
    let mut buckets: [Vec<(usize, Path)>; Shade::COUNT] = Default::default();
    for (index, path) in paths.into_iter().enumerate() {
        buckets[path.shade.index()].push((index, path));
    }

    let mut groups = Vec::new();
    for shade in Shade::darkest_first() {
        let bucket = std::mem::take(&mut buckets[shade.index()]);
        if bucket.is_empty() {
            continue;
        }
        let ordered = if optimize_travel {
            order_group(bucket)
        } else {
            bucket
                .into_iter()
                .map(|(index, path)| OrderedPath {
                    path,
                    sources: vec![index],
                })
                .collect()
        };
        tracing::debug!("Shade {} ordered into {} paths", shade, ordered.len());
        groups.push(ColorGroup {
            shade,
            paths: ordered,
        });
    }
    OrderedLayer { groups }
}

/// Index into `remaining` of the nearest endpoint, and whether it is the
/// path's end.
fn nearest_endpoint(remaining: &[(usize, Path)], cursor: &Point) -> Option<(usize, bool)> {
    let mut best: Option<(usize, bool, f64)> = None;
    for (i, (_, path)) in remaining.iter().enumerate() {
        let candidates = [(false, path.first_point()), (true, path.last_point())];
        for (is_end, point) in candidates {
            let Some(point) = point else { continue };
            let d = cursor.distance_sq(&point);
            if best.is_none_or(|(_, _, best_d)| d < best_d) {
                best = Some((i, is_end, d));
            }
        }
    }
    best.map(|(i, is_end, _)| (i, is_end))
}

fn order_group(mut remaining: Vec<(usize, Path)>) -> Vec<OrderedPath> {
    // Keep input index order so ties resolve to the lowest index.
    remaining.sort_by_key(|(index, _)| *index);

    let mut out: Vec<OrderedPath> = Vec::with_capacity(remaining.len());
    let mut cursor = Point::default();
    let mut has_last = false;

    while let Some((pick, is_end)) = nearest_endpoint(&remaining, &cursor) {
        let (index, mut path) = remaining.remove(pick);
        if is_end {
            path.reverse();
        }
        let Some(start) = path.first_point() else {
            continue;
        };
        let end = path.last_point().unwrap_or(start);

        match out.last_mut() {
            Some(last) if has_last && cursor.distance_to(&start) < JOIN_THRESHOLD => {
                append_path(&mut last.path, path);
                last.sources.push(index);
            }
            _ => {
                out.push(OrderedPath {
                    path,
                    sources: vec![index],
                });
                has_last = true;
            }
        }
        cursor = end;
    }
    out
}

fn append_path(target: &mut Path, next: Path) {
    let skip_first = match (target.last_point(), next.first_point()) {
        (Some(a), Some(b)) => a.distance_to(&b) < 1e-9,
        _ => false,
    };
    target.is_polygonal &= next.is_polygonal;
    target
        .segments
        .extend(next.segments.into_iter().skip(usize::from(skip_first)));
}
