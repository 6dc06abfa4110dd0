//! Error types for core buffer and geometry operations.
//!
//! The [`Error`] enum covers the failure modes of buffer construction and
//! target geometry: bad dimensions, channel count violations, and malformed
//! coordinates. Higher layers wrap these into their own taxonomies
//! (`aug-transforms::ApplyError`, `aug-pipeline::PipelineError`).

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core buffer and geometry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer length does not match the declared dimensions.
    #[error("invalid dimensions: {width}x{height}x{channels} ({reason})")]
    InvalidDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Declared channel count.
        channels: u32,
        /// Why the dimensions are invalid.
        reason: String,
    },

    /// Channel count is not usable for the operation.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count.
        expected: u32,
        /// Actual channel count.
        got: u32,
    },

    /// A bounding box or keypoint carries coordinates that cannot be
    /// interpreted in the active coordinate space.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(
        width: u32,
        height: u32,
        channels: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            channels,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: u32, got: u32) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::MalformedGeometry`] error.
    #[inline]
    pub fn malformed_geometry(msg: impl Into<String>) -> Self {
        Self::MalformedGeometry(msg.into())
    }
}
