//! Minimum-size padding.

use crate::border::{BorderMode, Fill};
use crate::error::ApplyResult;
use crate::transform::{TargetSupport, Transform};
use aug_core::{BoundingBox, Image, Keypoint, Mask, PixelFormat};
use aug_sample::{SampledParams, SpecError};
use serde::{Deserialize, Serialize};

/// Where the original content sits inside the padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadPosition {
    /// Content centered; padding split evenly (extra pixel goes right/bottom).
    #[default]
    Center,
    /// Content pinned to the top-left; all padding goes right/bottom.
    TopLeft,
}

/// Configuration for [`PadIfNeeded`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PadIfNeededConfig {
    /// Minimum output height in pixels.
    pub min_height: u32,
    /// Minimum output width in pixels.
    pub min_width: u32,
    /// Placement of the original content.
    #[serde(default)]
    pub position: PadPosition,
    /// How padded pixels resolve.
    #[serde(default)]
    pub border_mode: BorderMode,
    /// Fill for constant borders, uniform or per channel.
    #[serde(default)]
    pub fill: Fill,
    /// Fill label for constant borders on the mask.
    #[serde(default)]
    pub mask_fill: u8,
}

/// Pads the canvas up to a minimum size; inputs already large enough pass
/// through untouched.
///
/// Padding only ever grows the canvas, so coordinate targets translate by
/// the top-left pad amount and nothing is clipped or dropped.
#[derive(Debug, Clone)]
pub struct PadIfNeeded {
    config: PadIfNeededConfig,
}

impl PadIfNeeded {
    /// Builds the transform, rejecting a zero minimum extent.
    pub fn new(config: PadIfNeededConfig) -> Result<Self, SpecError> {
        if config.min_width == 0 || config.min_height == 0 {
            return Err(SpecError::InvalidValue {
                name: "pad_if_needed".into(),
                reason: "minimum extent must be positive".into(),
            });
        }
        Ok(Self { config })
    }

    /// Pad amounts on the left and top for this canvas.
    fn offsets(&self, canvas: (u32, u32)) -> (u32, u32) {
        let pad_w = self.config.min_width.saturating_sub(canvas.0);
        let pad_h = self.config.min_height.saturating_sub(canvas.1);
        match self.config.position {
            PadPosition::Center => (pad_w / 2, pad_h / 2),
            PadPosition::TopLeft => (0, 0),
        }
    }

    fn padded_size(&self, canvas: (u32, u32)) -> (u32, u32) {
        (
            canvas.0.max(self.config.min_width),
            canvas.1.max(self.config.min_height),
        )
    }

    fn pad_image<T: PixelFormat>(&self, src: &Image<T>, fill: &[T]) -> Image<T> {
        let (w, h) = src.dimensions();
        let (out_w, out_h) = self.padded_size((w, h));
        if (out_w, out_h) == (w, h) {
            return src.clone();
        }
        let (left, top) = self.offsets((w, h));
        let ch = src.channels() as usize;
        let mut out = Image::new(out_w, out_h, src.channels());
        {
            let data = out.data_mut();
            for y in 0..out_h as i64 {
                for x in 0..out_w as i64 {
                    let o = ((y * out_w as i64 + x) as usize) * ch;
                    let sx = x - left as i64;
                    let sy = y - top as i64;
                    match (
                        self.config.border_mode.fold(sx, w as i64),
                        self.config.border_mode.fold(sy, h as i64),
                    ) {
                        (Some(fx), Some(fy)) => {
                            let px = src.pixel(fx as u32, fy as u32);
                            data[o..o + ch].copy_from_slice(px);
                        }
                        _ => {
                            data[o..o + ch].copy_from_slice(fill);
                        }
                    }
                }
            }
        }
        out
    }
}

impl Transform for PadIfNeeded {
    fn name(&self) -> &'static str {
        "pad_if_needed"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn output_size(&self, input: (u32, u32), _params: &SampledParams) -> ApplyResult<(u32, u32)> {
        Ok(self.padded_size(input))
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        let fill = self.config.fill.resolve(image.channels())?;
        Ok(self.pad_image(image, &fill))
    }

    fn apply_to_mask(&self, mask: &Mask, _params: &SampledParams) -> ApplyResult<Mask> {
        let fill = vec![self.config.mask_fill; mask.channels() as usize];
        Ok(self.pad_image(mask, &fill))
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let (left, top) = self.offsets(canvas);
        let (dx, dy) = (left as f64, top as f64);
        Ok(bboxes
            .iter()
            .map(|b| BoundingBox {
                x_min: b.x_min + dx,
                y_min: b.y_min + dy,
                x_max: b.x_max + dx,
                y_max: b.y_max + dy,
                label: b.label,
            })
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let (left, top) = self.offsets(canvas);
        let (dx, dy) = (left as f64, top as f64);
        Ok(keypoints
            .iter()
            .map(|kp| kp.map_position(|x, y| (x + dx, y + dy)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: u32) -> PadIfNeededConfig {
        PadIfNeededConfig {
            min_height: min,
            min_width: min,
            position: PadPosition::Center,
            border_mode: BorderMode::Constant,
            fill: Fill::Uniform(0.5),
            mask_fill: 0,
        }
    }

    #[test]
    fn test_large_input_passes_through() {
        let t = PadIfNeeded::new(config(4)).unwrap();
        let img = Image::<f32>::filled(8, 8, 3, &[0.1, 0.2, 0.3]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out, img);
        assert_eq!(
            t.output_size((8, 8), &SampledParams::empty()).unwrap(),
            (8, 8)
        );
    }

    #[test]
    fn test_constant_pad_centers_content() {
        let t = PadIfNeeded::new(config(8)).unwrap();
        let img = Image::<f32>::filled(4, 4, 1, &[1.0]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.pixel(0, 0), &[0.5]);
        assert_eq!(out.pixel(2, 2), &[1.0]);
        assert_eq!(out.pixel(5, 5), &[1.0]);
        assert_eq!(out.pixel(6, 6), &[0.5]);
    }

    #[test]
    fn test_top_left_position() {
        let t = PadIfNeeded::new(PadIfNeededConfig {
            position: PadPosition::TopLeft,
            ..config(6)
        })
        .unwrap();
        let img = Image::<f32>::filled(3, 3, 1, &[1.0]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.pixel(0, 0), &[1.0]);
        assert_eq!(out.pixel(2, 2), &[1.0]);
        assert_eq!(out.pixel(3, 3), &[0.5]);
    }

    #[test]
    fn test_reflect_pad_mirrors_content() {
        let t = PadIfNeeded::new(PadIfNeededConfig {
            border_mode: BorderMode::Reflect,
            ..config(6)
        })
        .unwrap();
        let mut img = Image::<f32>::new(4, 4, 1);
        img.set_pixel(1, 0, &[1.0]);
        // Centered: content occupies [1, 5); column -1 reflects to column 1.
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.pixel(2, 1), &[1.0]);
        assert_eq!(out.pixel(0, 1), &[1.0]);
    }

    #[test]
    fn test_targets_translate_with_content() {
        let t = PadIfNeeded::new(config(8)).unwrap();
        let p = SampledParams::empty();
        let boxes = vec![BoundingBox::new(0.0, 0.0, 2.0, 2.0)];
        let out = t.apply_to_bboxes(&boxes, (4, 4), &p).unwrap();
        assert_eq!(out[0].x_min, 2.0);
        assert_eq!(out[0].x_max, 4.0);

        let kps = vec![Keypoint::new(1.0, 1.0)];
        let moved = t.apply_to_keypoints(&kps, (4, 4), &p).unwrap();
        assert_eq!(moved[0].x, 3.0);
        assert_eq!(moved[0].y, 3.0);
    }

    #[test]
    fn test_mask_pad_uses_mask_fill() {
        let t = PadIfNeeded::new(PadIfNeededConfig {
            mask_fill: 7,
            ..config(6)
        })
        .unwrap();
        let mask = Mask::filled(2, 2, 1, &[1]);
        let out = t.apply_to_mask(&mask, &SampledParams::empty()).unwrap();
        assert_eq!(out.pixel(0, 0), &[7]);
        assert_eq!(out.pixel(2, 2), &[1]);
    }

    #[test]
    fn test_per_channel_fill_pads_each_channel() {
        let t = PadIfNeeded::new(PadIfNeededConfig {
            fill: Fill::PerChannel(vec![0.48, 0.45, 0.41]),
            ..config(6)
        })
        .unwrap();
        let img = Image::<f32>::filled(2, 2, 3, &[1.0, 1.0, 1.0]);
        let out = t.apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out.pixel(0, 0), &[0.48, 0.45, 0.41]);
        assert_eq!(out.pixel(2, 2), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_per_channel_fill_length_must_match() {
        let t = PadIfNeeded::new(PadIfNeededConfig {
            fill: Fill::PerChannel(vec![0.5]),
            ..config(6)
        })
        .unwrap();
        let img = Image::<f32>::new(2, 2, 3);
        assert!(t.apply(&img, &SampledParams::empty()).is_err());
    }

    #[test]
    fn test_zero_minimum_rejected() {
        assert!(
            PadIfNeeded::new(PadIfNeededConfig {
                min_width: 0,
                ..config(4)
            })
            .is_err()
        );
    }
}
