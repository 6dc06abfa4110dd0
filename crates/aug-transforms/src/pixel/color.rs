//! Color and tone transforms.

use crate::error::ApplyResult;
use crate::transform::{TargetSupport, Transform, validate_specs};
use crate::ApplyError;
use aug_core::pixel::luminance_rec709;
use aug_core::Image;
use aug_sample::{NamedSpec, ParamSpec, SampledParams, SpecError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Maximum value for the per-invocation noise/permutation seed parameter.
pub(crate) const SEED_MAX: i64 = i64::MAX;

/// Declares the integer seed parameter pixel transforms derive their
/// per-pixel randomness from. Sampling it once per invocation keeps
/// repeated applies with the same parameter set bit-identical.
pub(crate) fn seed_spec() -> NamedSpec {
    NamedSpec::new("seed", ParamSpec::int_range(0, SEED_MAX))
}

// ============================================================================
// RandomBrightnessContrast
// ============================================================================

/// Configuration for [`RandomBrightnessContrast`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomBrightnessContrastConfig {
    /// Range the brightness shift is drawn from (added to values in [0, 1]).
    pub brightness_limit: (f64, f64),
    /// Range the contrast delta is drawn from (values scale by 1 + delta).
    pub contrast_limit: (f64, f64),
}

impl Default for RandomBrightnessContrastConfig {
    fn default() -> Self {
        Self {
            brightness_limit: (-0.2, 0.2),
            contrast_limit: (-0.2, 0.2),
        }
    }
}

/// Randomly shifts brightness and scales contrast.
#[derive(Debug, Clone)]
pub struct RandomBrightnessContrast {
    config: RandomBrightnessContrastConfig,
}

impl RandomBrightnessContrast {
    /// Builds the transform, validating the declared ranges.
    pub fn new(config: RandomBrightnessContrastConfig) -> Result<Self, SpecError> {
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for RandomBrightnessContrast {
    fn name(&self) -> &'static str {
        "random_brightness_contrast"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (b0, b1) = self.config.brightness_limit;
        let (c0, c1) = self.config.contrast_limit;
        vec![
            NamedSpec::new("brightness", ParamSpec::float_range(b0, b1)),
            NamedSpec::new("contrast", ParamSpec::float_range(c0, c1)),
        ]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let beta = params.f64("brightness")? as f32;
        let alpha = 1.0 + params.f64("contrast")? as f32;
        let mut out = image.clone();
        out.map_pixels(|px| {
            for v in px.iter_mut() {
                *v = (*v * alpha + beta).clamp(0.0, 1.0);
            }
        });
        Ok(out)
    }
}

// ============================================================================
// RandomGamma
// ============================================================================

/// Configuration for [`RandomGamma`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomGammaConfig {
    /// Gamma range in percent; the exponent is the draw divided by 100.
    pub gamma_limit: (f64, f64),
}

impl Default for RandomGammaConfig {
    fn default() -> Self {
        Self {
            gamma_limit: (80.0, 120.0),
        }
    }
}

/// Applies a random gamma curve.
#[derive(Debug, Clone)]
pub struct RandomGamma {
    config: RandomGammaConfig,
}

impl RandomGamma {
    /// Builds the transform, validating the declared range.
    pub fn new(config: RandomGammaConfig) -> Result<Self, SpecError> {
        if config.gamma_limit.0 <= 0.0 {
            return Err(SpecError::InvalidValue {
                name: "gamma_limit".into(),
                reason: "gamma must be positive".into(),
            });
        }
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for RandomGamma {
    fn name(&self) -> &'static str {
        "random_gamma"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (g0, g1) = self.config.gamma_limit;
        vec![NamedSpec::new("gamma", ParamSpec::float_range(g0, g1))]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let gamma = (params.f64("gamma")? / 100.0) as f32;
        let mut out = image.clone();
        out.map_pixels(|px| {
            for v in px.iter_mut() {
                *v = v.max(0.0).powf(gamma).clamp(0.0, 1.0);
            }
        });
        Ok(out)
    }
}

// ============================================================================
// Solarize
// ============================================================================

/// Configuration for [`Solarize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarizeConfig {
    /// Range the inversion threshold is drawn from, in [0, 1].
    pub threshold: (f64, f64),
}

impl Default for SolarizeConfig {
    fn default() -> Self {
        Self {
            threshold: (0.5, 0.5),
        }
    }
}

/// Inverts all values above a sampled threshold.
#[derive(Debug, Clone)]
pub struct Solarize {
    config: SolarizeConfig,
}

impl Solarize {
    /// Builds the transform, validating the declared range.
    pub fn new(config: SolarizeConfig) -> Result<Self, SpecError> {
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for Solarize {
    fn name(&self) -> &'static str {
        "solarize"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (t0, t1) = self.config.threshold;
        vec![NamedSpec::new("threshold", ParamSpec::float_range(t0, t1))]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let threshold = params.f64("threshold")? as f32;
        let mut out = image.clone();
        out.map_pixels(|px| {
            for v in px.iter_mut() {
                if *v >= threshold {
                    *v = 1.0 - *v;
                }
            }
        });
        Ok(out)
    }
}

// ============================================================================
// Posterize
// ============================================================================

/// Configuration for [`Posterize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterizeConfig {
    /// Range the retained bit count is drawn from (1..=8).
    pub num_bits: (i64, i64),
}

impl Default for PosterizeConfig {
    fn default() -> Self {
        Self { num_bits: (4, 4) }
    }
}

/// Reduces each channel to a sampled number of bits.
#[derive(Debug, Clone)]
pub struct Posterize {
    config: PosterizeConfig,
}

impl Posterize {
    /// Builds the transform, validating the declared range.
    pub fn new(config: PosterizeConfig) -> Result<Self, SpecError> {
        let (lo, hi) = config.num_bits;
        if lo < 1 || hi > 8 {
            return Err(SpecError::InvalidValue {
                name: "num_bits".into(),
                reason: "bit count must be within 1..=8".into(),
            });
        }
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for Posterize {
    fn name(&self) -> &'static str {
        "posterize"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (lo, hi) = self.config.num_bits;
        vec![NamedSpec::new("bits", ParamSpec::int_range(lo, hi))]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let bits = params.i64("bits")? as u32;
        let mask: u8 = 0xffu8 << (8 - bits);
        let mut out = image.clone();
        out.map_pixels(|px| {
            for v in px.iter_mut() {
                let q = ((v.clamp(0.0, 1.0) * 255.0).round() as u8) & mask;
                *v = q as f32 / 255.0;
            }
        });
        Ok(out)
    }
}

// ============================================================================
// InvertImg
// ============================================================================

/// Inverts every channel value (`v -> 1 - v`).
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertImg;

impl InvertImg {
    /// Creates the inversion transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for InvertImg {
    fn name(&self) -> &'static str {
        "invert_img"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        let mut out = image.clone();
        out.map_pixels(|px| {
            for v in px.iter_mut() {
                *v = 1.0 - *v;
            }
        });
        Ok(out)
    }
}

// ============================================================================
// ToGray
// ============================================================================

/// Replaces RGB with Rec.709 luminance, replicated across all three
/// channels so the shape is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToGray;

impl ToGray {
    /// Creates the grayscale transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for ToGray {
    fn name(&self) -> &'static str {
        "to_gray"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        if image.channels() != 3 {
            return Err(ApplyError::UnsupportedChannels {
                transform: "to_gray",
                got: image.channels(),
            });
        }
        let mut out = image.clone();
        out.map_pixels(|px| {
            let luma = luminance_rec709([px[0], px[1], px[2]]);
            px.fill(luma);
        });
        Ok(out)
    }
}

// ============================================================================
// ChannelShuffle
// ============================================================================

/// Randomly permutes the image's channels.
///
/// The permutation is derived from a sampled seed so the draw happens once
/// per invocation, not per target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelShuffle;

impl ChannelShuffle {
    /// Creates the shuffle transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for ChannelShuffle {
    fn name(&self) -> &'static str {
        "channel_shuffle"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        vec![seed_spec()]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let ch = image.channels() as usize;
        if ch == 1 {
            return Ok(image.clone());
        }
        let seed = params.i64("seed")? as u64;
        let mut rng = StdRng::seed_from_u64(seed);

        // Fisher-Yates over channel indices.
        let mut perm: Vec<usize> = (0..ch).collect();
        for i in (1..ch).rev() {
            let j = rng.gen_range(0..=i);
            perm.swap(i, j);
        }

        let mut out = image.clone();
        let mut scratch = vec![0.0f32; ch];
        {
            let data = out.data_mut();
            for px in data.chunks_exact_mut(ch) {
                scratch.copy_from_slice(px);
                for (dst, &src_idx) in px.iter_mut().zip(perm.iter()) {
                    *dst = scratch[src_idx];
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use aug_sample::sample_specs;

    fn params_of(t: &dyn Transform, seed: u64) -> SampledParams {
        let mut rng = StdRng::seed_from_u64(seed);
        sample_specs(&t.specs(), &mut rng).unwrap()
    }

    #[test]
    fn test_brightness_contrast_shape_invariant() {
        let t = RandomBrightnessContrast::new(Default::default()).unwrap();
        let img = Image::<f32>::filled(8, 6, 3, &[0.5, 0.5, 0.5]);
        let out = t.apply(&img, &params_of(&t, 1)).unwrap();
        assert_eq!(out.dimensions(), (8, 6));
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn test_brightness_applies_shift() {
        let t = RandomBrightnessContrast::new(RandomBrightnessContrastConfig {
            brightness_limit: (0.25, 0.25),
            contrast_limit: (0.0, 0.0),
        })
        .unwrap();
        let img = Image::<f32>::filled(2, 2, 1, &[0.5]);
        let out = t.apply(&img, &params_of(&t, 1)).unwrap();
        assert_relative_eq!(out.pixel(0, 0)[0], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_inverted_limit_rejected_at_build() {
        let res = RandomBrightnessContrast::new(RandomBrightnessContrastConfig {
            brightness_limit: (0.5, -0.5),
            contrast_limit: (0.0, 0.0),
        });
        assert!(res.is_err());
    }

    #[test]
    fn test_gamma_identity_at_100() {
        let t = RandomGamma::new(RandomGammaConfig {
            gamma_limit: (100.0, 100.0),
        })
        .unwrap();
        let img = Image::<f32>::filled(2, 2, 1, &[0.3]);
        let out = t.apply(&img, &params_of(&t, 9)).unwrap();
        assert_relative_eq!(out.pixel(0, 0)[0], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_gamma_rejects_zero() {
        assert!(
            RandomGamma::new(RandomGammaConfig {
                gamma_limit: (0.0, 50.0),
            })
            .is_err()
        );
    }

    #[test]
    fn test_solarize_inverts_above_threshold() {
        let t = Solarize::new(Default::default()).unwrap();
        let mut img = Image::<f32>::new(2, 1, 1);
        img.set_pixel(0, 0, &[0.8]);
        img.set_pixel(1, 0, &[0.2]);
        let out = t.apply(&img, &params_of(&t, 0)).unwrap();
        assert_relative_eq!(out.pixel(0, 0)[0], 0.2, epsilon = 1e-6);
        assert_relative_eq!(out.pixel(1, 0)[0], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_posterize_one_bit() {
        let t = Posterize::new(PosterizeConfig { num_bits: (1, 1) }).unwrap();
        let img = Image::<f32>::filled(2, 2, 1, &[0.7]);
        let out = t.apply(&img, &params_of(&t, 0)).unwrap();
        // 0.7 * 255 = 178, masked to the top bit = 128.
        assert_relative_eq!(out.pixel(0, 0)[0], 128.0 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn test_posterize_rejects_out_of_range_bits() {
        assert!(Posterize::new(PosterizeConfig { num_bits: (0, 4) }).is_err());
        assert!(Posterize::new(PosterizeConfig { num_bits: (1, 9) }).is_err());
    }

    #[test]
    fn test_invert() {
        let img = Image::<f32>::filled(2, 2, 1, &[0.25]);
        let out = InvertImg::new()
            .apply(&img, &SampledParams::empty())
            .unwrap();
        assert_relative_eq!(out.pixel(0, 0)[0], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_to_gray_flattens_channels() {
        let img = Image::<f32>::filled(2, 2, 3, &[1.0, 0.0, 0.0]);
        let out = ToGray::new().apply(&img, &SampledParams::empty()).unwrap();
        let px = out.pixel(0, 0);
        assert_relative_eq!(px[0], 0.2126, epsilon = 1e-4);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn test_to_gray_rejects_single_channel() {
        let img = Image::<f32>::new(2, 2, 1);
        let err = ToGray::new()
            .apply(&img, &SampledParams::empty())
            .unwrap_err();
        assert!(matches!(err, ApplyError::UnsupportedChannels { .. }));
    }

    #[test]
    fn test_channel_shuffle_preserves_values() {
        let t = ChannelShuffle::new();
        let img = Image::<f32>::filled(2, 2, 3, &[0.1, 0.2, 0.3]);
        let out = t.apply(&img, &params_of(&t, 5)).unwrap();
        let mut px: Vec<f32> = out.pixel(0, 0).to_vec();
        px.sort_by(f32::total_cmp);
        assert_eq!(px, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_channel_shuffle_deterministic_per_params() {
        let t = ChannelShuffle::new();
        let img = Image::<f32>::filled(2, 2, 3, &[0.1, 0.2, 0.3]);
        let params = params_of(&t, 5);
        let a = t.apply(&img, &params).unwrap();
        let b = t.apply(&img, &params).unwrap();
        assert_eq!(a, b);
    }
}
