//! Additive noise transforms.

use crate::error::ApplyResult;
use crate::transform::{TargetSupport, Transform, validate_specs};
use aug_core::Image;
use aug_sample::{NamedSpec, ParamSpec, SampledParams, SpecError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::color::seed_spec;

/// Configuration for [`GaussNoise`].
///
/// Variance and mean are declared in 8-bit units (the convention of the
/// reference library) and scaled to the normalized [0, 1] domain on apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussNoiseConfig {
    /// Range the noise variance is drawn from, in 8-bit units.
    pub var_limit: (f64, f64),
    /// Mean of the noise, in 8-bit units.
    pub mean: f64,
    /// Draw independent noise per channel instead of per pixel.
    pub per_channel: bool,
}

impl Default for GaussNoiseConfig {
    fn default() -> Self {
        Self {
            var_limit: (10.0, 50.0),
            mean: 0.0,
            per_channel: true,
        }
    }
}

/// Adds Gaussian noise to every pixel.
///
/// The noise field is derived from a sampled seed, so applying twice with
/// the same parameter set produces the identical field.
#[derive(Debug, Clone)]
pub struct GaussNoise {
    config: GaussNoiseConfig,
}

impl GaussNoise {
    /// Builds the transform, validating the variance range.
    pub fn new(config: GaussNoiseConfig) -> Result<Self, SpecError> {
        if config.var_limit.0 < 0.0 {
            return Err(SpecError::InvalidValue {
                name: "var_limit".into(),
                reason: "variance cannot be negative".into(),
            });
        }
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for GaussNoise {
    fn name(&self) -> &'static str {
        "gauss_noise"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (v0, v1) = self.config.var_limit;
        vec![
            NamedSpec::new("var", ParamSpec::float_range(v0, v1)),
            seed_spec(),
        ]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let sigma = (params.f64("var")?.sqrt() / 255.0) as f32;
        let mean = (self.config.mean / 255.0) as f32;
        let seed = params.i64("seed")? as u64;
        let mut rng = StdRng::seed_from_u64(seed);

        let ch = image.channels() as usize;
        let mut out = image.clone();
        {
            let data = out.data_mut();
            if self.config.per_channel {
                for v in data.iter_mut() {
                    *v = (*v + mean + gauss(&mut rng) * sigma).clamp(0.0, 1.0);
                }
            } else {
                for px in data.chunks_exact_mut(ch) {
                    let n = mean + gauss(&mut rng) * sigma;
                    for v in px.iter_mut() {
                        *v = (*v + n).clamp(0.0, 1.0);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// One standard-normal draw via Box-Muller.
fn gauss<R: Rng>(rng: &mut R) -> f32 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    ((-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()) as f32
}
