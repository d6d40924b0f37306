use pancakekit_core::{Path, Point, Shade};
use pancakekit_designer::optimizer::{optimize, JOIN_THRESHOLD};
use proptest::prelude::*;

fn line(a: (f64, f64), b: (f64, f64), shade: u8) -> Path {
    Path::polyline(&[Point::new(a.0, a.1), Point::new(b.0, b.1)], Shade::new(shade))
}

#[test]
fn test_equal_distances_prefer_lowest_index() {
    // Both paths start 10 units from the origin.
    let layer = optimize(
        vec![
            line((0.0, 10.0), (0.0, 100.0), 0),
            line((10.0, 0.0), (100.0, 0.0), 0),
        ],
        true,
    );
    assert_eq!(layer.groups[0].paths[0].sources, vec![0]);
}

#[test]
fn test_start_beats_end_at_equal_distance() {
    // Start and end are both 10 units from the origin.
    let layer = optimize(vec![line((10.0, 0.0), (0.0, 10.0), 0)], true);
    let path = &layer.groups[0].paths[0].path;
    assert_eq!(path.first_point(), Some(Point::new(10.0, 0.0)));
}

#[test]
fn test_cursor_resets_between_groups() {
    let layer = optimize(
        vec![
            line((300.0, 0.0), (400.0, 0.0), 3),
            line((500.0, 0.0), (2.0, 0.0), 0),
            line((5.0, 5.0), (6.0, 200.0), 0),
        ],
        true,
    );
    let light = &layer.groups[1];
    assert_eq!(light.shade, Shade::new(0));
    // From the origin the reversed path's (2,0) end is nearest.
    assert_eq!(light.paths[0].sources[0], 1);
    assert_eq!(light.paths[0].path.first_point(), Some(Point::new(2.0, 0.0)));
}

#[test]
fn test_greedy_order_reduces_travel() {
    let paths = vec![
        line((300.0, 0.0), (310.0, 0.0), 1),
        line((0.0, 0.0), (10.0, 0.0), 1),
        line((150.0, 0.0), (160.0, 0.0), 1),
    ];
    let unordered = optimize(paths.clone(), false).travel_distance();
    let ordered = optimize(paths, true).travel_distance();
    assert!(ordered < unordered);
    assert!((ordered - 280.0).abs() < 1e-9);
}

fn arb_path() -> impl Strategy<Value = Path> {
    (
        prop::collection::vec((0.0f64..400.0, 0.0f64..400.0), 2..6),
        0u8..4,
    )
        .prop_map(|(coords, shade)| {
            let points: Vec<Point> = coords.iter().map(|(x, y)| Point::new(*x, *y)).collect();
            Path::polyline(&points, Shade::new(shade))
        })
}

proptest! {
    #[test]
    fn prop_shades_and_sources_are_preserved(paths in prop::collection::vec(arb_path(), 0..30)) {
        let mut expected = [0usize; 4];
        for p in &paths {
            expected[p.shade.index()] += 1;
        }
        let input_len = paths.len();
        let layer = optimize(paths, true);

        let mut seen = vec![false; input_len];
        let mut actual = [0usize; 4];
        for group in &layer.groups {
            prop_assert!(!group.paths.is_empty());
            for ordered in &group.paths {
                prop_assert_eq!(ordered.path.shade, group.shade);
                for &src in &ordered.sources {
                    prop_assert!(!seen[src], "path {} emitted twice", src);
                    seen[src] = true;
                    actual[group.shade.index()] += 1;
                }
            }
        }
        prop_assert!(seen.iter().all(|s| *s));
        prop_assert_eq!(actual, expected);

        let shades: Vec<Shade> = layer.groups.iter().map(|g| g.shade).collect();
        let mut sorted = shades.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        prop_assert_eq!(shades, sorted);
    }

    #[test]
    fn prop_joined_paths_meet_within_threshold(paths in prop::collection::vec(arb_path(), 1..20)) {
        let layer = optimize(paths, true);
        for group in &layer.groups {
            for pair in group.paths.windows(2) {
                let end = pair[0].path.last_point().unwrap();
                let start = pair[1].path.first_point().unwrap();
                // Separate entries were not close enough to join.
                prop_assert!(end.distance_to(&start) >= JOIN_THRESHOLD);
            }
        }
    }
}
