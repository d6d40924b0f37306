//! # PancakeKit Core
//!
//! Core types shared by the PancakeKit crates: planar geometry, the shaded
//! path record, the layer arena that replaces loose parent/child pointers,
//! and the pipeline's error taxonomy.

pub mod error;
pub mod geometry;
pub mod path;
pub mod scene;

pub use error::{Error, FloodFillError, GeometryError, Result};
pub use geometry::{Point, Rect};
pub use path::{InvalidShade, Path, Segment, Shade};
pub use scene::{CompoundPath, Group, Layer, Node, NodeId};
