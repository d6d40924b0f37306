//! Drawing paths and their shade attribute.
//!
//! A [`Path`] is a tagged record: the shade, fill flag and polygonal flag are
//! explicit fields rather than loose attributes, and a missing shade in a
//! scene document always deserializes as shade 0.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Palette index of one of the four batter shades. Higher is darker.
///
/// Scene documents carry the raw index; anything outside the palette is
/// rejected when the document is read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Shade(u8);

/// A shade index outside the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("shade {0} is outside the palette 0..=3")]
pub struct InvalidShade(pub u8);

impl TryFrom<u8> for Shade {
    type Error = InvalidShade;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Shade::try_new(index).ok_or(InvalidShade(index))
    }
}

impl From<Shade> for u8 {
    fn from(shade: Shade) -> u8 {
        shade.0
    }
}

impl Shade {
    pub const LIGHTEST: Shade = Shade(0);
    pub const DARKEST: Shade = Shade(3);
    pub const COUNT: usize = 4;

    /// Creates a shade, clamping anything above the darkest index.
    pub fn new(index: u8) -> Self {
        Shade(index.min(Self::DARKEST.0))
    }

    /// Creates a shade only if the index is in the palette.
    pub fn try_new(index: u8) -> Option<Self> {
        (index <= Self::DARKEST.0).then_some(Shade(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All shades in print order, darkest first.
    pub fn darkest_first() -> [Shade; 4] {
        [Shade(3), Shade(2), Shade(1), Shade(0)]
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path vertex with optional cubic handles, stored relative to `point`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Point>,
}

impl Segment {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            handle_in: None,
            handle_out: None,
        }
    }

    pub fn with_handles(point: Point, handle_in: Point, handle_out: Point) -> Self {
        Self {
            point,
            handle_in: Some(handle_in),
            handle_out: Some(handle_out),
        }
    }

    /// True when either handle bends the adjoining curve.
    pub fn has_handles(&self) -> bool {
        let bends = |h: &Option<Point>| h.is_some_and(|h| h.x != 0.0 || h.y != 0.0);
        bends(&self.handle_in) || bends(&self.handle_out)
    }

    /// Swaps the handles, as required when the owning path is reversed.
    pub fn reversed(&self) -> Self {
        Self {
            point: self.point,
            handle_in: self.handle_out,
            handle_out: self.handle_in,
        }
    }
}

/// An ordered run of segments drawn in one shade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Path {
    pub segments: Vec<Segment>,
    pub closed: bool,
    pub is_fill: bool,
    pub is_polygonal: bool,
    pub shade: Shade,
}

impl Path {
    /// Creates an open polygonal path through `points`.
    pub fn polyline(points: &[Point], shade: Shade) -> Self {
        Self {
            segments: points.iter().copied().map(Segment::new).collect(),
            closed: false,
            is_fill: false,
            is_polygonal: true,
            shade,
        }
    }

    /// Creates a closed polygonal path through `points`.
    pub fn polygon(points: &[Point], shade: Shade) -> Self {
        Self {
            closed: true,
            ..Self::polyline(points, shade)
        }
    }

    pub fn with_fill(mut self, is_fill: bool) -> Self {
        self.is_fill = is_fill;
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first_point(&self) -> Option<Point> {
        self.segments.first().map(|s| s.point)
    }

    pub fn last_point(&self) -> Option<Point> {
        self.segments.last().map(|s| s.point)
    }

    /// Vertex positions, ignoring handles.
    pub fn points(&self) -> Vec<Point> {
        self.segments.iter().map(|s| s.point).collect()
    }

    /// True when any segment carries curve handles that need flattening.
    pub fn has_curves(&self) -> bool {
        !self.is_polygonal && self.segments.iter().any(Segment::has_handles)
    }

    /// Reverses drawing direction in place.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for seg in &mut self.segments {
            *seg = seg.reversed();
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.segments.iter().map(|s| &s.point))
    }

    /// Converts a closed path into an open one that ends on a copy of its
    /// first segment. Open paths are left untouched, so repeated calls are
    /// no-ops.
    pub fn open_closed_loop(&mut self) {
        if !self.closed {
            return;
        }
        self.closed = false;
        if let Some(first) = self.segments.first().copied() {
            self.segments.push(first);
        }
    }
}
