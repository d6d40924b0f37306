//! Error handling for PancakeKit
//!
//! Provides the error kinds raised by the toolpath pipeline:
//! - Geometry errors (regions too small to fill, offset failures)
//! - Flood fill errors (unbounded regions, rasterization, bad seeds)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// Geometry error type
///
/// Raised while converting fill regions into strokes. These never abort a
/// render: the fill converter logs them and drops the region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Region too small to fill or offset
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Why the region was rejected.
        reason: String,
    },

    /// The clipping library produced no paths for an offset operation
    #[error("Clipping failed: {reason}")]
    ClippingFailure {
        /// Description of the failed operation.
        reason: String,
    },
}

impl GeometryError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub fn clipping(reason: impl Into<String>) -> Self {
        Self::ClippingFailure {
            reason: reason.into(),
        }
    }
}

/// Flood fill error type
///
/// Reported synchronously to the interactive caller of the fill tool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FloodFillError {
    /// The flood reached the edge of the sampled raster
    #[error("Fill area is not closed")]
    UnboundedFill,

    /// Sampling the layer into a raster failed
    #[error("Fill failed: {reason}")]
    RasterizationFailure {
        /// What went wrong while rasterizing.
        reason: String,
    },

    /// The seed point lies outside the sampled raster or on ink
    #[error("Invalid fill seed at ({x:.3}, {y:.3})")]
    InvalidSeed {
        /// Seed X in scene units.
        x: f64,
        /// Seed Y in scene units.
        y: f64,
    },
}

/// Main error type for PancakeKit
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Flood fill error
    #[error(transparent)]
    FloodFill(#[from] FloodFillError),

    /// Invalid render configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Scene or config (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias using the PancakeKit error type
pub type Result<T> = std::result::Result<T, Error>;
