//! Error types for transform application.

use aug_sample::SampleError;
use thiserror::Error;

/// Error type for transform application.
///
/// Any of these aborts the whole pipeline invocation: a partially
/// transformed target set would be inconsistent with the image.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Core buffer or geometry failure.
    #[error(transparent)]
    Core(#[from] aug_core::Error),

    /// A sampled parameter was missing or mistyped.
    #[error(transparent)]
    Sample(#[from] SampleError),

    /// The transform cannot process this channel count.
    #[error("{transform}: unsupported channel count {got}")]
    UnsupportedChannels {
        /// Transform identifier.
        transform: &'static str,
        /// Channel count of the offending image.
        got: u32,
    },

    /// Geometry that cannot be applied (singular matrix, crop larger than
    /// the canvas, malformed box).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for transform application.
pub type ApplyResult<T> = Result<T, ApplyError>;
