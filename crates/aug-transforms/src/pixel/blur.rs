//! Blur transforms.

use crate::border::BorderMode;
use crate::error::ApplyResult;
use crate::transform::{TargetSupport, Transform, validate_specs};
use aug_core::Image;
use aug_sample::{NamedSpec, ParamSpec, ParamValue, SampledParams, SpecError};
use serde::{Deserialize, Serialize};

/// Configuration for [`Blur`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurConfig {
    /// Inclusive range the kernel size is drawn from; only odd sizes >= 3
    /// inside the range are eligible.
    pub blur_limit: (i64, i64),
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self { blur_limit: (3, 7) }
    }
}

/// Box blur with a randomly sampled odd kernel size.
#[derive(Debug, Clone)]
pub struct Blur {
    /// Odd kernel sizes eligible for sampling.
    kernel_sizes: Vec<i64>,
}

impl Blur {
    /// Builds the transform.
    ///
    /// # Errors
    ///
    /// Rejects inverted ranges and ranges that contain no odd size >= 3.
    pub fn new(config: BlurConfig) -> Result<Self, SpecError> {
        let (lo, hi) = config.blur_limit;
        if lo > hi {
            return Err(SpecError::InvertedBounds {
                name: "blur_limit".into(),
                low: lo as f64,
                high: hi as f64,
            });
        }
        let kernel_sizes: Vec<i64> = (lo.max(3)..=hi).filter(|k| k % 2 == 1).collect();
        if kernel_sizes.is_empty() {
            return Err(SpecError::InvalidValue {
                name: "blur_limit".into(),
                reason: "no odd kernel size >= 3 in range".into(),
            });
        }
        let t = Self { kernel_sizes };
        validate_specs(&t.specs())?;
        Ok(t)
    }
}

impl Transform for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let options = self.kernel_sizes.iter().map(|k| ParamValue::Int(*k)).collect();
        vec![NamedSpec::new("ksize", ParamSpec::choice(options))]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let ksize = params.i64("ksize")? as usize;
        Ok(box_blur(image, ksize))
    }
}

/// Separable box blur with reflected edges.
fn box_blur(src: &Image<f32>, ksize: usize) -> Image<f32> {
    let radius = (ksize / 2) as i64;
    let horizontal = blur_pass(src, radius, true);
    blur_pass(&horizontal, radius, false)
}

/// One blur pass along an axis.
fn blur_pass(src: &Image<f32>, radius: i64, horizontal: bool) -> Image<f32> {
    let (w, h) = src.dimensions();
    let ch = src.channels() as usize;
    let norm = 1.0 / (2 * radius + 1) as f32;
    let mut out = Image::<f32>::new(w, h, src.channels());
    {
        let data = out.data_mut();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                let idx = ((y * w as i64 + x) as usize) * ch;
                for c in 0..ch {
                    let mut sum = 0.0f32;
                    for d in -radius..=radius {
                        let (sx, sy) = if horizontal { (x + d, y) } else { (x, y + d) };
                        // Reflect keeps the window fully populated at edges.
                        let fx = BorderMode::Reflect.fold(sx, w as i64).unwrap_or(0);
                        let fy = BorderMode::Reflect.fold(sy, h as i64).unwrap_or(0);
                        sum += src.pixel(fx as u32, fy as u32)[c];
                    }
                    data[idx + c] = sum * norm;
                }
            }
        }
    }
    out
}
