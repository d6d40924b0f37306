//! # PancakeKit Designer
//!
//! Toolpath planning between the drawing and the code emitter.
//!
//! ## Pipeline stages
//!
//! ```text
//! Layer (working copy)
//!   ├── prune_degenerate      drop zero-length paths and empty containers
//!   ├── convert_fills         hatch or pocket every fill region
//!   ├── normalize             flatten compounds, open closed loops
//!   └── optimize              darkest-first groups, nearest-endpoint order
//! ```
//!
//! The flood fill tool runs on its own: [`flood_fill`] samples a layer
//! through a [`Rasterizer`] and returns new fill geometry for the same
//! pipeline.

pub mod fill;
pub mod flatten;
pub mod flood_fill;
pub mod normalize;
pub mod optimizer;
pub mod rasterizer;
pub mod simplify;

pub use fill::{convert_fill, convert_fills, FillOutput};
pub use flatten::flatten_points;
pub use flood_fill::{flood_fill, FloodFillResult, Grid};
pub use normalize::{normalize, prune_degenerate, NormalizedLayer};
pub use optimizer::{optimize, ColorGroup, OrderedLayer, OrderedPath, JOIN_THRESHOLD};
pub use rasterizer::{AlphaMask, Rasterizer, TinySkiaRasterizer};
