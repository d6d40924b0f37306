//! Scene to machine coordinate mapping.
//!
//! X maps the view's horizontal bounds onto `[print_area.x, print_area.l]`,
//! swapped when the output is mirrored. Y maps `[0, view.height]` onto
//! `[print_area.t, print_area.y]`. Machine values are rounded to three
//! decimals.

use pancakekit_core::Point;
use pancakekit_settings::{PrintArea, RenderConfig, ViewBounds};
use serde::Serialize;

/// A position in machine millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MachinePoint {
    pub x: f64,
    pub y: f64,
}

impl MachinePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn map_range(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (v - in_min) * (out_max - out_min) / (in_max - in_min)
}

fn round3(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    view: ViewBounds,
    area: PrintArea,
    flip: bool,
}

impl CoordinateMapper {
    pub fn new(view: ViewBounds, area: PrintArea, flip: bool) -> Self {
        Self { view, area, flip }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.view, config.print_area, config.flip_output)
    }

    fn x_range(&self) -> (f64, f64) {
        if self.flip {
            (self.area.l, self.area.x)
        } else {
            (self.area.x, self.area.l)
        }
    }

    /// Scene point to machine point.
    pub fn remap(&self, p: &Point) -> MachinePoint {
        let (x_min, x_max) = self.x_range();
        MachinePoint::new(
            round3(map_range(
                p.x,
                self.view.x,
                self.view.x + self.view.width,
                x_min,
                x_max,
            )),
            round3(map_range(p.y, 0.0, self.view.height, self.area.t, self.area.y)),
        )
    }

    /// Machine point back to scene space.
    pub fn unmap(&self, m: &MachinePoint) -> Point {
        let (x_min, x_max) = self.x_range();
        Point::new(
            map_range(m.x, x_min, x_max, self.view.x, self.view.x + self.view.width),
            map_range(m.y, self.area.t, self.area.y, 0.0, self.view.height),
        )
    }
}
