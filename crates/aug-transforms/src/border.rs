//! Border policy for out-of-canvas samples.
//!
//! Any transform that can expose regions outside the original canvas
//! (rotate, affine, pad) takes an explicit [`BorderMode`]. Constant mode
//! carries separate fill values for image and mask — they are configured
//! independently and never default to the same value implicitly.

use crate::error::{ApplyError, ApplyResult};
use serde::{Deserialize, Serialize};

/// Constant-border fill value for image pixels.
///
/// A scalar fills every channel; a list gives one value per channel in
/// image channel order. In YAML both `fill: 0.5` and `fill: [0.48, 0.45,
/// 0.41]` parse. Mask fills stay a single label and do not use this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fill {
    /// One value applied to every channel.
    Uniform(f32),
    /// One value per channel, length matching the image.
    PerChannel(Vec<f32>),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Uniform(0.0)
    }
}

impl Fill {
    /// Expands to one value per channel for the given image.
    ///
    /// A per-channel list whose length differs from the image's channel
    /// count is an error.
    pub fn resolve(&self, channels: u32) -> ApplyResult<Vec<f32>> {
        match self {
            Fill::Uniform(v) => Ok(vec![*v; channels as usize]),
            Fill::PerChannel(values) => {
                if values.len() != channels as usize {
                    return Err(ApplyError::Core(aug_core::Error::channel_mismatch(
                        channels,
                        values.len() as u32,
                    )));
                }
                Ok(values.clone())
            }
        }
    }
}

impl From<f32> for Fill {
    fn from(v: f32) -> Self {
        Fill::Uniform(v)
    }
}

/// Policy for pixels sampled outside the source canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Fill with an explicit constant value.
    Constant,
    /// Mirror across the edge without repeating the edge row
    /// (`gfedcb|abcdefgh|gfedcb`).
    #[default]
    Reflect,
    /// Repeat the edge row (`aaaaaa|abcdefgh|hhhhhh`).
    Replicate,
    /// Wrap around to the opposite edge (`cdefgh|abcdefgh|abcdef`).
    Wrap,
}

impl BorderMode {
    /// Folds a coordinate into `[0, size)` according to the mode.
    ///
    /// Returns `None` for [`BorderMode::Constant`] when the coordinate is
    /// outside — the caller substitutes the explicit fill value.
    #[inline]
    pub fn fold(&self, coord: i64, size: i64) -> Option<i64> {
        debug_assert!(size > 0);
        if (0..size).contains(&coord) {
            return Some(coord);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(coord.clamp(0, size - 1)),
            BorderMode::Wrap => Some(coord.rem_euclid(size)),
            BorderMode::Reflect => {
                if size == 1 {
                    return Some(0);
                }
                // Mirror with period 2*(size-1), edge row not repeated.
                let period = 2 * (size - 1);
                let m = coord.rem_euclid(period);
                Some(if m < size { m } else { period - m })
            }
        }
    }
}
