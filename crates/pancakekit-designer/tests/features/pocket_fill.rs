use pancakekit_core::{GeometryError, Layer, Path, Point, Shade};
use pancakekit_designer::fill::{convert_fill, pocket_fill};
use pancakekit_settings::RenderConfig;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ]
}

#[test]
fn test_pocket_produces_nested_contours_in_place() {
    let output = pocket_fill(&[rect(200.0, 100.0, 40.0, 40.0)], Shade::new(3), 4.0, 0.5).unwrap();
    let paths = output.paths();
    // Insets at 2, 6, 10, 14 and 18 from each side.
    assert_eq!(paths.len(), 5);
    for path in paths {
        assert!(path.closed);
        assert!(!path.is_fill);
        assert_eq!(path.shade, Shade::new(3));
        for p in path.points() {
            assert!(p.x >= 200.0 && p.x <= 240.0, "x {} outside region", p.x);
            assert!(p.y >= 100.0 && p.y <= 140.0, "y {} outside region", p.y);
        }
    }

    let outer = paths[0].bounds().unwrap();
    assert!((outer.min_x - 202.0).abs() < 1e-6);
    assert!((outer.max_y - 138.0).abs() < 1e-6);
}

#[test]
fn test_pocket_keeps_clear_of_holes() {
    let rings = vec![rect(0.0, 0.0, 60.0, 60.0), rect(20.0, 20.0, 20.0, 20.0)];
    let output = pocket_fill(&rings, Shade::new(1), 4.0, 0.5).unwrap();
    for path in output.paths() {
        for p in path.points() {
            let inside_hole = p.x > 20.0 && p.x < 40.0 && p.y > 20.0 && p.y < 40.0;
            assert!(!inside_hole, "vertex {:?} inside the hole", p);
        }
    }
}

#[test]
fn test_tool_wider_than_region_yields_nothing() {
    let err = pocket_fill(&[rect(0.0, 0.0, 50.0, 4.0)], Shade::new(0), 6.0, 0.5).unwrap_err();
    assert!(matches!(err, GeometryError::ClippingFailure { .. }));
}

#[test]
fn test_narrow_region_is_dropped_by_converter() {
    // 3mm tool width maps to 6 scene units with the stock profile.
    let config = RenderConfig::default();
    let mut layer = Layer::new();
    let id = layer.add_path(Path::polygon(&rect(10.0, 10.0, 80.0, 5.0), Shade::new(0)).with_fill(true));
    let paths = layer.paths_of(id);
    assert!(convert_fill(&paths, Shade::new(0), &config).is_none());
}

#[test]
fn test_pocket_arcs_keep_tool_clearance_at_reflex_corner() {
    // L shape whose reflex corner sits at (20, 20).
    let ring = vec![
        Point::new(0.0, 0.0),
        Point::new(40.0, 0.0),
        Point::new(40.0, 20.0),
        Point::new(20.0, 20.0),
        Point::new(20.0, 40.0),
        Point::new(0.0, 40.0),
    ];
    let tolerance = 0.1;
    let output = pocket_fill(&[ring], Shade::new(0), 4.0, tolerance).unwrap();
    let corner = Point::new(20.0, 20.0);

    let first = &output.paths()[0];
    let points = first.points();
    let mut closest = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let mid = Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
        closest = closest.min(p.distance_to(&corner)).min(mid.distance_to(&corner));
    }
    assert!(
        closest >= 2.0 - tolerance - 1e-6,
        "contour comes within {} of the corner",
        closest
    );
    assert!(points.len() > 6, "arc was not subdivided");
}
