//! Resampling to a fixed output size.
//!
//! The image path is a separable two-pass filter: horizontal, then
//! vertical. When downscaling, the kernel widens by the scale factor so it
//! averages over the source footprint instead of point-sampling. Masks use
//! their own filter, direct nearest-neighbor index mapping by default.

use crate::error::{ApplyError, ApplyResult};
use crate::interp::Interpolation;
use crate::transform::{TargetSupport, Transform};
use aug_core::{BoundingBox, Image, Keypoint, Mask};
use aug_sample::{SampledParams, SpecError};
use serde::{Deserialize, Serialize};

/// Configuration for [`Resize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeConfig {
    /// Output height in pixels.
    pub height: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Image resampling filter.
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Mask resampling filter; nearest keeps labels unblended.
    #[serde(default = "default_mask_interpolation")]
    pub mask_interpolation: Interpolation,
}

fn default_mask_interpolation() -> Interpolation {
    Interpolation::Nearest
}

/// Resamples the image to `width x height` regardless of input size.
#[derive(Debug, Clone)]
pub struct Resize {
    config: ResizeConfig,
}

impl Resize {
    /// Builds the transform, rejecting a zero-area output.
    pub fn new(config: ResizeConfig) -> Result<Self, SpecError> {
        if config.width == 0 || config.height == 0 {
            return Err(SpecError::InvalidValue {
                name: "resize".into(),
                reason: format!("output {}x{} has zero area", config.width, config.height),
            });
        }
        Ok(Self { config })
    }

    fn factors(&self, canvas: (u32, u32)) -> (f64, f64) {
        (
            self.config.width as f64 / canvas.0 as f64,
            self.config.height as f64 / canvas.1 as f64,
        )
    }
}

impl Transform for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn output_size(&self, input: (u32, u32), _params: &SampledParams) -> ApplyResult<(u32, u32)> {
        if input.0 == 0 || input.1 == 0 {
            return Err(ApplyError::InvalidGeometry(
                "cannot resize a zero-area image".into(),
            ));
        }
        Ok((self.config.width, self.config.height))
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        if image.is_empty() {
            return Err(ApplyError::InvalidGeometry(
                "cannot resize a zero-area image".into(),
            ));
        }
        let horizontal = resize_axis(image, self.config.width, true, self.config.interpolation);
        Ok(resize_axis(
            &horizontal,
            self.config.height,
            false,
            self.config.interpolation,
        ))
    }

    fn apply_to_mask(&self, mask: &Mask, _params: &SampledParams) -> ApplyResult<Mask> {
        if mask.is_empty() {
            return Err(ApplyError::InvalidGeometry(
                "cannot resize a zero-area mask".into(),
            ));
        }
        if self.config.mask_interpolation == Interpolation::Nearest {
            return Ok(resize_mask_nearest(
                mask,
                self.config.width,
                self.config.height,
            ));
        }
        let as_f32 = mask.convert_format::<f32>();
        let horizontal = resize_axis(
            &as_f32,
            self.config.width,
            true,
            self.config.mask_interpolation,
        );
        let resized = resize_axis(
            &horizontal,
            self.config.height,
            false,
            self.config.mask_interpolation,
        );
        Ok(resized.convert_format::<u8>())
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let (fx, fy) = self.factors(canvas);
        Ok(bboxes
            .iter()
            .map(|b| b.map_corners(|x, y| (x * fx, y * fy)))
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let (fx, fy) = self.factors(canvas);
        Ok(keypoints
            .iter()
            .map(|kp| kp.map_position(|x, y| (x * fx, y * fy)).scaled_by(fx.max(fy)))
            .collect())
    }
}

/// Resamples one axis of the image to `new_size`.
fn resize_axis(src: &Image<f32>, new_size: u32, horizontal: bool, interp: Interpolation) -> Image<f32> {
    let (src_w, src_h) = src.dimensions();
    let (out_w, out_h, axis_len) = if horizontal {
        (new_size, src_h, src_w)
    } else {
        (src_w, new_size, src_h)
    };
    let ch = src.channels() as usize;
    let ratio = axis_len as f64 / new_size as f64;

    // Widen the kernel when minifying so it covers the source footprint.
    let filter_scale = ratio.max(1.0) as f32;
    let support = interp.support() * filter_scale;

    let mut out = Image::<f32>::new(out_w, out_h, src.channels());
    {
        let data = out.data_mut();
        for oy in 0..out_h {
            for ox in 0..out_w {
                let o = (oy as usize * out_w as usize + ox as usize) * ch;
                let pos = if horizontal { ox } else { oy };
                let center = (pos as f64 + 0.5) * ratio - 0.5;

                if interp == Interpolation::Nearest {
                    let i = nearest_index(pos, ratio, axis_len);
                    let (sx, sy) = if horizontal { (i, oy) } else { (ox, i) };
                    data[o..o + ch].copy_from_slice(src.pixel(sx, sy));
                    continue;
                }

                let lo = ((center as f32 - support).ceil() as i64).max(0);
                let hi = ((center as f32 + support).floor() as i64).min(axis_len as i64 - 1);
                let mut acc = vec![0.0f32; ch];
                let mut weight_sum = 0.0f32;
                for i in lo..=hi {
                    let w = interp.weight((i as f32 - center as f32) / filter_scale);
                    if w == 0.0 {
                        continue;
                    }
                    weight_sum += w;
                    let (sx, sy) = if horizontal {
                        (i as u32, oy)
                    } else {
                        (ox, i as u32)
                    };
                    let px = src.pixel(sx, sy);
                    for c in 0..ch {
                        acc[c] += px[c] * w;
                    }
                }
                if weight_sum > 0.0 {
                    for (d, a) in data[o..o + ch].iter_mut().zip(&acc) {
                        *d = a / weight_sum;
                    }
                } else {
                    let i = nearest_index(pos, ratio, axis_len);
                    let (sx, sy) = if horizontal { (i, oy) } else { (ox, i) };
                    data[o..o + ch].copy_from_slice(src.pixel(sx, sy));
                }
            }
        }
    }
    out
}

#[inline]
fn nearest_index(pos: u32, ratio: f64, axis_len: u32) -> u32 {
    (((pos as f64 + 0.5) * ratio) as u32).min(axis_len - 1)
}

fn resize_mask_nearest(src: &Mask, new_w: u32, new_h: u32) -> Mask {
    let (src_w, src_h) = src.dimensions();
    let ch = src.channels() as usize;
    let rx = src_w as f64 / new_w as f64;
    let ry = src_h as f64 / new_h as f64;
    let mut out = Mask::new(new_w, new_h, src.channels());
    {
        let data = out.data_mut();
        for y in 0..new_h {
            let sy = nearest_index(y, ry, src_h);
            for x in 0..new_w {
                let sx = nearest_index(x, rx, src_w);
                let o = (y as usize * new_w as usize + x as usize) * ch;
                data[o..o + ch].copy_from_slice(src.pixel(sx, sy));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_output_rejected() {
        assert!(
            Resize::new(ResizeConfig {
                height: 0,
                width: 64,
                interpolation: Interpolation::default(),
                mask_interpolation: default_mask_interpolation(),
            })
            .is_err()
        );
    }

    #[test]
    fn test_output_size_ignores_input() {
        let t = Resize::new(ResizeConfig {
            height: 64,
            width: 48,
            interpolation: Interpolation::default(),
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let p = SampledParams::empty();
        assert_eq!(t.output_size((32, 32), &p).unwrap(), (48, 64));
        assert_eq!(t.output_size((256, 100), &p).unwrap(), (48, 64));
        assert!(t.output_size((0, 10), &p).is_err());
    }

    #[test]
    fn test_identity_resize_preserves_image() {
        let t = Resize::new(ResizeConfig {
            height: 8,
            width: 8,
            interpolation: Interpolation::Bilinear,
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let mut img = Image::<f32>::new(8, 8, 3);
        img.set_pixel(2, 5, &[0.9, 0.1, 0.4]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        for (a, b) in out.data().iter().zip(img.data()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_upscale_constant_stays_constant() {
        let t = Resize::new(ResizeConfig {
            height: 64,
            width: 64,
            interpolation: Interpolation::Bicubic,
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let img = Image::<f32>::filled(16, 16, 3, &[0.3, 0.6, 0.9]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.dimensions(), (64, 64));
        for (_, _, px) in out.pixels() {
            assert_relative_eq!(px[0], 0.3, epsilon = 1e-4);
            assert_relative_eq!(px[1], 0.6, epsilon = 1e-4);
            assert_relative_eq!(px[2], 0.9, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_downscale_averages_halves() {
        // Left half dark, right half bright; 2x downscale keeps the split.
        let mut img = Image::<f32>::new(8, 8, 1);
        {
            let data = img.data_mut();
            for y in 0..8usize {
                for x in 4..8usize {
                    data[y * 8 + x] = 1.0;
                }
            }
        }
        let t = Resize::new(ResizeConfig {
            height: 4,
            width: 4,
            interpolation: Interpolation::Bilinear,
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert!(out.pixel(0, 2)[0] < 0.2);
        assert!(out.pixel(3, 2)[0] > 0.8);
    }

    #[test]
    fn test_mask_resize_never_blends_labels() {
        let mut mask = Mask::new(4, 4, 1);
        {
            let data = mask.data_mut();
            for (i, v) in data.iter_mut().enumerate() {
                *v = if i % 2 == 0 { 3 } else { 7 };
            }
        }
        let t = Resize::new(ResizeConfig {
            height: 9,
            width: 9,
            interpolation: Interpolation::default(),
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let out = t.apply_to_mask(&mask, &SampledParams::empty()).unwrap();
        for v in out.data() {
            assert!(*v == 3 || *v == 7);
        }
    }

    #[test]
    fn test_mask_resize_bilinear_blends_labels() {
        // Left half 0, right half 200; upscaling with bilinear produces
        // intermediate values across the boundary.
        let mut mask = Mask::new(4, 4, 1);
        {
            let data = mask.data_mut();
            for y in 0..4usize {
                for x in 2..4usize {
                    data[y * 4 + x] = 200;
                }
            }
        }
        let t = Resize::new(ResizeConfig {
            height: 8,
            width: 8,
            interpolation: Interpolation::default(),
            mask_interpolation: Interpolation::Bilinear,
        })
        .unwrap();
        let out = t.apply_to_mask(&mask, &SampledParams::empty()).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert!(out.data().iter().any(|v| *v != 0 && *v != 200));
    }

    #[test]
    fn test_mask_interpolation_defaults_to_nearest() {
        let cfg: ResizeConfig = serde_yaml::from_str("height: 8\nwidth: 8").unwrap();
        assert_eq!(cfg.mask_interpolation, Interpolation::Nearest);
        let cfg: ResizeConfig =
            serde_yaml::from_str("height: 8\nwidth: 8\nmask_interpolation: bilinear").unwrap();
        assert_eq!(cfg.mask_interpolation, Interpolation::Bilinear);
    }

    #[test]
    fn test_bbox_and_keypoint_scale_with_canvas() {
        let t = Resize::new(ResizeConfig {
            height: 64,
            width: 64,
            interpolation: Interpolation::default(),
            mask_interpolation: default_mask_interpolation(),
        })
        .unwrap();
        let p = SampledParams::empty();
        let boxes = vec![BoundingBox::new(0.0, 0.0, 16.0, 16.0)];
        let out = t.apply_to_bboxes(&boxes, (32, 32), &p).unwrap();
        assert_eq!(out[0].x_max, 32.0);
        assert_eq!(out[0].y_max, 32.0);

        let kps = vec![Keypoint::new(8.0, 16.0).with_scale(1.0)];
        let moved = t.apply_to_keypoints(&kps, (32, 32), &p).unwrap();
        assert_eq!(moved[0].x, 16.0);
        assert_eq!(moved[0].y, 32.0);
        assert_eq!(moved[0].scale, Some(2.0));
    }
}
