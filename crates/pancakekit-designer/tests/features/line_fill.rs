use pancakekit_core::{GeometryError, Point, Shade};
use pancakekit_designer::fill::{line_fill, FillOutput};

fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ]
}

#[test]
fn test_horizontal_hatch_alternates_direction() {
    let output = line_fill(&[rect(0.0, 0.0, 100.0, 40.0)], Shade::new(2), 10.0, 0.0).unwrap();
    let FillOutput::Compound { shade, paths } = output else {
        panic!("expected a compound of strokes");
    };
    assert_eq!(shade, Shade::new(2));
    assert_eq!(paths.len(), 4);

    let ys: Vec<f64> = paths.iter().map(|p| p.first_point().unwrap().y).collect();
    assert_eq!(ys, vec![5.0, 15.0, 25.0, 35.0]);

    for (i, path) in paths.iter().enumerate() {
        assert_eq!(path.len(), 2);
        assert!(!path.is_fill);
        let start = path.first_point().unwrap();
        if i % 2 == 0 {
            assert!((start.x - 0.0).abs() < 1e-9);
        } else {
            assert!((start.x - 100.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_hatch_skips_holes() {
    let rings = vec![rect(0.0, 0.0, 100.0, 100.0), rect(40.0, 40.0, 20.0, 20.0)];
    let output = line_fill(&rings, Shade::new(0), 10.0, 0.0).unwrap();
    for path in output.paths() {
        let a = path.first_point().unwrap();
        let b = path.last_point().unwrap();
        let mid = a.lerp(&b, 0.5);
        let in_hole = mid.x > 40.0 && mid.x < 60.0 && mid.y > 40.0 && mid.y < 60.0;
        assert!(!in_hole, "stroke {:?} -> {:?} crosses the hole", a, b);
    }
    // Lines at y=45 and y=55 are split in two.
    assert_eq!(output.paths().len(), 12);
}

#[test]
fn test_angled_hatch_stays_inside_region() {
    let output = line_fill(&[rect(0.0, 0.0, 80.0, 60.0)], Shade::new(1), 5.0, 23.0).unwrap();
    assert!(output.paths().len() > 5);
    for path in output.paths() {
        for p in path.points() {
            assert!(p.x > -1e-6 && p.x < 80.0 + 1e-6);
            assert!(p.y > -1e-6 && p.y < 60.0 + 1e-6);
        }
    }
}

#[test]
fn test_degenerate_region_is_rejected() {
    let err = line_fill(&[rect(0.0, 0.0, 0.5, 0.5)], Shade::new(0), 10.0, 0.0).unwrap_err();
    assert!(matches!(err, GeometryError::DegenerateGeometry { .. }));
}
