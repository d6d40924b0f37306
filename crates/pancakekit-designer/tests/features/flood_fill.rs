use pancakekit_core::{FloodFillError, Layer, Path, Point, Rect, Shade};
use pancakekit_designer::flood_fill::{chain_loops, flood_fill, FloodFillResult, Grid};
use pancakekit_designer::rasterizer::{AlphaMask, Rasterizer, TinySkiaRasterizer};
use pancakekit_settings::FillToolConfig;

/// Draws axis-aligned one-cell-thick square outlines into a mask.
struct OutlineRasterizer {
    squares: Vec<(usize, usize, usize)>,
    gap: Option<(usize, usize)>,
}

impl Rasterizer for OutlineRasterizer {
    fn sample(&self, region: &Rect, resolution: f64) -> Result<AlphaMask, FloodFillError> {
        let mut mask = AlphaMask::blank(region, resolution);
        for &(x0, y0, size) in &self.squares {
            let x1 = x0 + size + 1;
            let y1 = y0 + size + 1;
            for x in x0..=x1 {
                mask.set(x, y0, 255);
                mask.set(x, y1, 255);
            }
            for y in y0..=y1 {
                mask.set(x0, y, 255);
                mask.set(x1, y, 255);
            }
        }
        if let Some((x, y)) = self.gap {
            mask.set(x, y, 0);
        }
        Ok(mask)
    }
}

fn region() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 100.0)
}

#[test]
fn test_enclosed_square_traces_one_loop() {
    // Ink ring at cells 24 and 75 encloses a 50x50 interior.
    let raster = OutlineRasterizer {
        squares: vec![(24, 24, 50)],
        gap: None,
    };
    let config = FillToolConfig::default();
    let result = flood_fill(
        Point::new(50.0, 50.0),
        &Layer::new(),
        &raster,
        &region(),
        Shade::new(2),
        &config,
    )
    .unwrap();

    let FloodFillResult::Path(path) = result else {
        panic!("expected a single loop, got {:?}", result);
    };
    assert!(path.closed);
    assert!(path.is_fill);
    assert_eq!(path.shade, Shade::new(2));
    let bounds = path.bounds().unwrap();
    assert!((bounds.width() - 50.0).abs() <= config.coarse_tolerance);
    assert!((bounds.height() - 50.0).abs() <= config.coarse_tolerance);
    assert!(path.len() < 50, "loop was not simplified: {} points", path.len());
}

#[test]
fn test_open_outline_is_unbounded() {
    let raster = OutlineRasterizer {
        squares: vec![(24, 24, 50)],
        gap: Some((50, 24)),
    };
    let err = flood_fill(
        Point::new(50.0, 50.0),
        &Layer::new(),
        &raster,
        &region(),
        Shade::new(0),
        &FillToolConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, FloodFillError::UnboundedFill);
}

#[test]
fn test_island_becomes_a_hole() {
    let raster = OutlineRasterizer {
        squares: vec![(10, 10, 80), (40, 40, 20)],
        gap: None,
    };
    let result = flood_fill(
        Point::new(20.0, 20.0),
        &Layer::new(),
        &raster,
        &region(),
        Shade::new(1),
        &FillToolConfig::default(),
    )
    .unwrap();
    let FloodFillResult::Compound { shade, paths } = result else {
        panic!("expected outer loop plus hole, got {:?}", result);
    };
    assert_eq!(shade, Shade::new(1));
    assert_eq!(paths.len(), 2);
}

#[test]
fn test_seed_checks() {
    let raster = OutlineRasterizer {
        squares: vec![(24, 24, 50)],
        gap: None,
    };
    let config = FillToolConfig::default();
    let on_ink = flood_fill(
        Point::new(24.5, 50.0),
        &Layer::new(),
        &raster,
        &region(),
        Shade::new(0),
        &config,
    );
    assert!(matches!(on_ink, Err(FloodFillError::InvalidSeed { .. })));

    let outside = flood_fill(
        Point::new(150.0, 50.0),
        &Layer::new(),
        &raster,
        &region(),
        Shade::new(0),
        &config,
    );
    assert!(matches!(outside, Err(FloodFillError::InvalidSeed { .. })));
}

#[test]
fn test_seed_on_existing_fill_returns_it() {
    let mut layer = Layer::new();
    let id = layer.add_path(
        Path::polygon(
            &[
                Point::new(10.0, 10.0),
                Point::new(60.0, 10.0),
                Point::new(60.0, 60.0),
                Point::new(10.0, 60.0),
            ],
            Shade::new(3),
        )
        .with_fill(true),
    );
    let raster = OutlineRasterizer {
        squares: vec![],
        gap: None,
    };
    let result = flood_fill(
        Point::new(30.0, 30.0),
        &layer,
        &raster,
        &region(),
        Shade::new(0),
        &FillToolConfig::default(),
    )
    .unwrap();
    assert_eq!(result, FloodFillResult::Existing(id));
}

#[test]
fn test_tiny_skia_outline_fills() {
    let mut layer = Layer::new();
    layer.add_path(Path::polygon(
        &[
            Point::new(20.0, 20.0),
            Point::new(80.0, 20.0),
            Point::new(80.0, 80.0),
            Point::new(20.0, 80.0),
        ],
        Shade::new(0),
    ));
    let config = FillToolConfig::default();
    let raster = TinySkiaRasterizer::new(&layer, config.stroke_width);
    let result = flood_fill(
        Point::new(50.0, 50.0),
        &layer,
        &raster,
        &region(),
        Shade::new(1),
        &config,
    )
    .unwrap();
    let FloodFillResult::Path(path) = result else {
        panic!("expected one loop, got {:?}", result);
    };
    let bounds = path.bounds().unwrap();
    // Stroke of width 4 leaves roughly 56 units inside.
    assert!((bounds.width() - 56.0).abs() < 3.0, "width {}", bounds.width());
}

#[test]
fn test_chain_splits_distant_points() {
    let mut points: Vec<Point> = (0..5).map(|i| Point::new(i as f64, 0.0)).collect();
    points.extend((0..5).map(|i| Point::new(100.0 + i as f64, 50.0)));
    let loops = chain_loops(points, 10.0);
    assert_eq!(loops.len(), 2);
    assert_eq!(loops[0][0], Point::new(0.0, 0.0));
}

#[test]
fn test_grid_cell_mapping() {
    let mask = AlphaMask::blank(&Rect::new(10.0, 20.0, 30.0, 40.0), 2.0);
    let grid = Grid::from_alpha(&mask, 150).unwrap();
    assert_eq!((grid.width(), grid.height()), (40, 40));
    assert_eq!(grid.cell_at(&Point::new(10.2, 20.7)), Some((0, 1)));
    assert_eq!(grid.cell_at(&Point::new(9.0, 25.0)), None);
    assert_eq!(grid.cell_center(0, 0), Point::new(10.25, 20.25));
}

fn outline(min: f64, size: f64) -> Path {
    Path::polygon(
        &[
            Point::new(min, min),
            Point::new(min + size, min),
            Point::new(min + size, min + size),
            Point::new(min, min + size),
        ],
        Shade::new(0),
    )
}

#[test]
fn test_hole_of_existing_fill_can_be_filled() {
    let mut layer = Layer::new();
    layer.add_path(outline(10.0, 80.0));
    layer.add_path(outline(35.0, 30.0));
    let config = FillToolConfig::default();

    let ring = flood_fill(
        Point::new(20.0, 20.0),
        &layer,
        &TinySkiaRasterizer::new(&layer, config.stroke_width),
        &region(),
        Shade::new(2),
        &config,
    )
    .unwrap();
    assert!(matches!(ring, FloodFillResult::Compound { .. }));
    ring.add_to(&mut layer);

    let hole = flood_fill(
        Point::new(50.0, 50.0),
        &layer,
        &TinySkiaRasterizer::new(&layer, config.stroke_width),
        &region(),
        Shade::new(3),
        &config,
    )
    .unwrap();
    let FloodFillResult::Path(path) = hole else {
        panic!("expected the hole interior as one loop, got {:?}", hole);
    };
    assert_eq!(path.shade, Shade::new(3));
    let bounds = path.bounds().unwrap();
    assert!(bounds.width() < 30.0, "width {}", bounds.width());
    assert!(bounds.min_x > 35.0 && bounds.max_x < 65.0);
}

struct ShortMaskRasterizer;

impl Rasterizer for ShortMaskRasterizer {
    fn sample(&self, region: &Rect, resolution: f64) -> Result<AlphaMask, FloodFillError> {
        let mut mask = AlphaMask::blank(region, resolution);
        mask.alpha.truncate(10);
        Ok(mask)
    }
}

#[test]
fn test_mismatched_mask_is_a_rasterization_failure() {
    let err = flood_fill(
        Point::new(50.0, 50.0),
        &Layer::new(),
        &ShortMaskRasterizer,
        &region(),
        Shade::new(0),
        &FillToolConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FloodFillError::RasterizationFailure { .. }));
}
