//! Ramer-Douglas-Peucker polyline simplification.

use pancakekit_core::Point;

fn segment_distance_sq(p: &Point, a: &Point, b: &Point) -> f64 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq == 0.0 {
        return p.distance_sq(a);
    }
    let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len_sq).clamp(0.0, 1.0);
    p.distance_sq(&Point::new(a.x + t * vx, a.y + t * vy))
}

/// Simplifies an open polyline. Endpoints are always kept.
pub fn simplify_polyline(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 || tolerance <= 0.0 {
        return points.to_vec();
    }
    let tol_sq = tolerance * tolerance;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut index = start;
        for i in (start + 1)..end {
            let d = segment_distance_sq(&points[i], &points[start], &points[end]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > tol_sq {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplifies a closed loop given without a repeated start point.
///
/// The loop is split at the vertex farthest from the first one and both
/// halves are simplified as polylines. Loops that would collapse below three
/// vertices are returned unchanged.
pub fn simplify_loop(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 3 || tolerance <= 0.0 {
        return points.to_vec();
    }
    let first = points[0];
    let split = points
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, -1.0), |(best, best_d), (i, p)| {
            let d = p.distance_sq(&first);
            if d > best_d {
                (i, d)
            } else {
                (best, best_d)
            }
        })
        .0;

    let mut head = simplify_polyline(&points[..=split], tolerance);
    let mut tail_input: Vec<Point> = points[split..].to_vec();
    tail_input.push(first);
    let tail = simplify_polyline(&tail_input, tolerance);

    head.pop();
    head.extend(tail);
    head.pop();

    if head.len() < 3 {
        points.to_vec()
    } else {
        head
    }
}
