//! Pixel component formats.
//!
//! Augmentation kernels run on `f32` internally; images arriving as `u8`,
//! `u16`, or `f16` convert through [`PixelFormat`] at the pipeline boundary.
//! Integer formats normalize to [0.0, 1.0] on conversion, float formats pass
//! through unchanged.
//!
//! # Example
//!
//! ```
//! use aug_core::PixelFormat;
//!
//! let byte_val: u8 = 128;
//! let float_val = byte_val.to_f32();
//! assert!((float_val - 0.502).abs() < 0.01);
//!
//! let back: u8 = PixelFormat::from_f32(float_val);
//! assert_eq!(back, 128);
//! ```

use half::f16;

/// Rec.709 luminance coefficients as an array [R, G, B].
///
/// Used by grayscale conversion: `Y = 0.2126*R + 0.7152*G + 0.0722*B`.
pub const REC709_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Calculate Rec.709 luminance from RGB values.
///
/// # Example
///
/// ```
/// use aug_core::pixel::luminance_rec709;
/// let luma = luminance_rec709([0.5, 0.3, 0.2]);
/// assert!((luma - 0.3353).abs() < 0.0001);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA[0] + rgb[1] * REC709_LUMA[1] + rgb[2] * REC709_LUMA[2]
}

/// Trait for pixel component types.
///
/// Implemented for the formats augmentation inputs arrive in:
///
/// - `u8` - 8-bit unsigned (0-255)
/// - `u16` - 16-bit unsigned (0-65535)
/// - `f16` - 16-bit float (half precision)
/// - `f32` - 32-bit float (single precision)
pub trait PixelFormat: Copy + Clone + Default + Send + Sync + PartialOrd + 'static {
    /// Number of bits per channel.
    const BITS: u32;

    /// Whether this is a floating-point format.
    const IS_FLOAT: bool;

    /// Maximum representable value.
    const MAX_VALUE: f32;

    /// Convert to f32. Integers normalize to [0.0, 1.0].
    fn to_f32(self) -> f32;

    /// Convert from f32. Integers expect [0.0, 1.0] and clamp.
    fn from_f32(v: f32) -> Self;

    /// Linear interpolation between two values.
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::from_f32(a.to_f32() * (1.0 - t) + b.to_f32() * t)
    }

    /// Zero value.
    fn zero() -> Self;

    /// One value (1.0 for floats, max for integers).
    fn one() -> Self;
}

impl PixelFormat for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;
    const MAX_VALUE: f32 = 255.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        255
    }
}

impl PixelFormat for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;
    const MAX_VALUE: f32 = 65535.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        65535
    }
}

impl PixelFormat for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;
    const MAX_VALUE: f32 = 65504.0;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::from_f32(0.0)
    }

    #[inline]
    fn one() -> Self {
        f16::from_f32(1.0)
    }
}

impl PixelFormat for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;
    const MAX_VALUE: f32 = f32::MAX;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_roundtrip() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let f = v.to_f32();
            assert!((0.0..=1.0).contains(&f));
            let back: u8 = PixelFormat::from_f32(f);
            assert_eq!(back, v);
        }
    }

    #[test]
    fn test_u8_from_f32_clamps() {
        let over: u8 = PixelFormat::from_f32(1.5);
        let under: u8 = PixelFormat::from_f32(-0.5);
        assert_eq!(over, 255);
        assert_eq!(under, 0);
    }

    #[test]
    fn test_f32_passthrough() {
        assert_eq!(2.5f32.to_f32(), 2.5);
        let v: f32 = PixelFormat::from_f32(-1.0);
        assert_eq!(v, -1.0);
    }

    #[test]
    fn test_f16_roundtrip() {
        let h: f16 = PixelFormat::from_f32(0.5);
        assert!((h.to_f32() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_lerp() {
        let mid = u8::lerp(0, 255, 0.5);
        assert!((mid as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_luminance() {
        // Pure white has luminance 1.
        assert!((luminance_rec709([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-5);
        // Green dominates.
        assert!(luminance_rec709([0.0, 1.0, 0.0]) > luminance_rec709([1.0, 0.0, 0.0]));
    }
}
