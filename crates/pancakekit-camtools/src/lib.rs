//! # PancakeKit CAM Tools
//!
//! Machine-side half of the pipeline.
//!
//! - **Coordinates**: scene to print-area mapping with optional mirroring
//! - **G-code**: the printer's command protocol
//! - **Emitter**: header, per-path deposition, bottle changes and footer
//! - **Pipeline**: `render(layer, config)` from a drawing to a script

pub mod coordinates;
pub mod emitter;
pub mod error;
pub mod gcode;
pub mod pipeline;

pub use coordinates::{CoordinateMapper, MachinePoint};
pub use emitter::{emit, Emission, Emitter};
pub use error::{CamToolError, CamToolResult};
pub use gcode::GcodeCommand;
pub use pipeline::{render, render_to_file, render_with_stats, RenderOutput, RenderStats};
