use pancakekit_camtools::emitter::{FOOTER_NOTE, HEADER_END_NOTE};
use pancakekit_camtools::{render, render_with_stats};
use pancakekit_core::{Layer, Path, Point, Shade};
use pancakekit_settings::RenderConfig;

fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
    ]
}

/// Lines strictly between the header and footer markers.
fn body(script: &str) -> Vec<&str> {
    let lines: Vec<&str> = script.lines().collect();
    let start = lines
        .iter()
        .position(|l| l.trim_start_matches(';') == HEADER_END_NOTE)
        .expect("header marker");
    let end = lines
        .iter()
        .position(|l| l.trim_start_matches(';') == FOOTER_NOTE)
        .expect("footer marker");
    lines[start + 1..end].to_vec()
}

fn is_move(line: &str) -> bool {
    line.starts_with("G00 X")
}

/// Moves that visit path vertices, leaving out the positioning move that
/// precedes each pump-off.
fn vertex_moves<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .enumerate()
        .filter(|(i, l)| is_move(l) && !lines.get(i + 1).is_some_and(|n| n.starts_with("M107")))
        .map(|(_, l)| *l)
        .collect()
}

#[test]
fn test_single_closed_square() {
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(&square(100.0, 100.0, 100.0), Shade::new(0)));
    let script = render(&layer, &RenderConfig::default()).unwrap();

    assert_eq!(script.matches("GCODE header start").count(), 1);
    assert_eq!(script.matches(FOOTER_NOTE).count(), 1);

    let body = body(&script);
    assert_eq!(body.iter().filter(|l| l.starts_with("M106")).count(), 1);
    assert_eq!(body.iter().filter(|l| l.starts_with("M107")).count(), 1);
    let moves = vertex_moves(&body);
    assert_eq!(moves.len(), 5);
    assert_eq!(moves[0], moves[4]);
    assert_eq!(moves[0], "G00 X92.000 Y50.000");
}

#[test]
fn test_darker_shade_prints_first_with_one_bottle_change() {
    let mut layer = Layer::new();
    layer.add_path(Path::polyline(
        &[Point::new(100.0, 300.0), Point::new(300.0, 300.0)],
        Shade::new(0),
    ));
    layer.add_path(Path::polyline(
        &[Point::new(100.0, 100.0), Point::new(300.0, 100.0)],
        Shade::new(3),
    ));
    let script = render(&layer, &RenderConfig::default()).unwrap();
    let body = body(&script);

    assert_eq!(body.iter().filter(|l| l.starts_with("M142")).count(), 1);
    let change = body.iter().position(|l| l.starts_with("M142")).unwrap();
    let shade3_moves: Vec<usize> = body
        .iter()
        .enumerate()
        .filter(|(_, l)| is_move(l) && l.ends_with("Y50.000"))
        .map(|(i, _)| i)
        .collect();
    let shade0_moves: Vec<usize> = body
        .iter()
        .enumerate()
        .filter(|(_, l)| is_move(l) && l.ends_with("Y150.000"))
        .map(|(i, _)| i)
        .collect();
    assert!(!shade3_moves.is_empty() && !shade0_moves.is_empty());
    assert!(shade3_moves.iter().all(|i| *i < change));
    assert!(shade0_moves.iter().all(|i| *i > change));
    assert!(body.contains(&"G4 P15000 ;Pause for 15000 milliseconds"));
}

#[test]
fn test_fill_region_becomes_strokes() {
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(&square(100.0, 100.0, 60.0), Shade::new(1)).with_fill(true));
    let output = render_with_stats(&layer, &RenderConfig::default()).unwrap();

    assert_eq!(output.stats.input_paths, 1);
    assert_eq!(output.stats.fills_dropped, 0);
    assert!(output.stats.normalized_paths > 1);
    assert_eq!(output.stats.shade_groups, 1);
    assert_eq!(output.stats.shade_changes, 0);
    let pumps = body(&output.gcode)
        .iter()
        .filter(|l| l.starts_with("M106"))
        .count();
    assert_eq!(pumps, output.stats.drawn_paths);
}

#[test]
fn test_narrow_fill_is_dropped_without_failing() {
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(&square(100.0, 100.0, 4.0), Shade::new(1)).with_fill(true));
    let output = render_with_stats(&layer, &RenderConfig::default()).unwrap();
    assert_eq!(output.stats.fills_dropped, 1);
    assert_eq!(output.stats.drawn_paths, 0);
    assert!(body(&output.gcode).is_empty());
}

#[test]
fn test_render_leaves_scene_untouched() {
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(&square(10.0, 10.0, 50.0), Shade::new(2)).with_fill(true));
    layer.add_path(Path::polygon(&square(200.0, 10.0, 50.0), Shade::new(0)));
    let before = layer.clone();
    let first = render(&layer, &RenderConfig::default()).unwrap();
    let second = render(&layer, &RenderConfig::default()).unwrap();
    assert_eq!(layer, before);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = RenderConfig {
        bot_speed: 0,
        ..Default::default()
    };
    assert!(render(&Layer::new(), &config).is_err());
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pancake.gcode");
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(&square(100.0, 100.0, 100.0), Shade::new(0)));
    let stats =
        pancakekit_camtools::render_to_file(&layer, &RenderConfig::default(), &out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with(";PancakeKit v"));
    assert_eq!(stats.drawn_paths, 1);
}
