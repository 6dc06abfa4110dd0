//! Interpolation filters for resampling.
//!
//! One filter enum serves both the separable resize pass and the inverse
//! warp. Image and mask filters are configured independently; masks default
//! to [`Interpolation::Nearest`] so label integers are never blended.

use serde::{Deserialize, Serialize};

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest-neighbor (no interpolation; the mask default).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    #[default]
    Bilinear,
    /// Bicubic (Mitchell-Netravali) interpolation.
    Bicubic,
    /// Lanczos-3 (high quality, best for downscaling).
    Lanczos3,
}

impl Interpolation {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Interpolation::Nearest => 0.5,
            Interpolation::Bilinear => 1.0,
            Interpolation::Bicubic => 2.0,
            Interpolation::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Interpolation::Nearest => nearest_weight(x),
            Interpolation::Bilinear => bilinear_weight(x),
            Interpolation::Bicubic => bicubic_weight(x),
            Interpolation::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

/// Nearest-neighbor weight function.
#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

/// Bilinear (triangle) weight function.
#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Bicubic (Mitchell-Netravali) weight function.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    // Mitchell-Netravali with B=1/3, C=1/3
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

/// Lanczos weight function.
#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_weights_at_center() {
        assert!((Interpolation::Nearest.weight(0.0) - 1.0).abs() < 0.01);
        assert!((Interpolation::Bilinear.weight(0.0) - 1.0).abs() < 0.01);
        assert!((Interpolation::Lanczos3.weight(0.0) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_filter_weights_outside_support() {
        assert_eq!(Interpolation::Nearest.weight(0.6), 0.0);
        assert_eq!(Interpolation::Bilinear.weight(1.1), 0.0);
        assert_eq!(Interpolation::Bicubic.weight(2.1), 0.0);
        assert_eq!(Interpolation::Lanczos3.weight(3.1), 0.0);
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&Interpolation::Lanczos3).unwrap();
        assert_eq!(yaml.trim(), "lanczos3");
        let back: Interpolation = serde_yaml::from_str("bicubic").unwrap();
        assert_eq!(back, Interpolation::Bicubic);
    }
}
