//! Mirror flips.
//!
//! Flips are exact: no resampling, no border handling, every pixel moves to
//! a pixel. Coordinate targets use the continuous convention `x' = w - x`,
//! so a box flipped twice returns to its original corners bit-for-bit.

use crate::error::ApplyResult;
use crate::transform::{TargetSupport, Transform};
use aug_core::{BoundingBox, Image, Keypoint, Mask, PixelFormat};
use aug_sample::SampledParams;

fn flip_image_h<T: PixelFormat>(src: &Image<T>) -> Image<T> {
    let (w, h) = src.dimensions();
    let ch = src.channels() as usize;
    let mut out = Image::new(w, h, src.channels());
    {
        let data = out.data_mut();
        for y in 0..h {
            let row = src.row(y);
            let base = y as usize * w as usize * ch;
            for x in 0..w as usize {
                let d = base + (w as usize - 1 - x) * ch;
                data[d..d + ch].copy_from_slice(&row[x * ch..(x + 1) * ch]);
            }
        }
    }
    out
}

fn flip_image_v<T: PixelFormat>(src: &Image<T>) -> Image<T> {
    let (w, h) = src.dimensions();
    let row_len = w as usize * src.channels() as usize;
    let mut out = Image::new(w, h, src.channels());
    {
        let data = out.data_mut();
        for y in 0..h {
            let d = (h - 1 - y) as usize * row_len;
            data[d..d + row_len].copy_from_slice(src.row(y));
        }
    }
    out
}

/// Mirrors the image across the vertical axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalFlip;

impl HorizontalFlip {
    /// Creates the transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for HorizontalFlip {
    fn name(&self) -> &'static str {
        "horizontal_flip"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        Ok(flip_image_h(image))
    }

    fn apply_to_mask(&self, mask: &Mask, _params: &SampledParams) -> ApplyResult<Mask> {
        Ok(flip_image_h(mask))
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let w = canvas.0 as f64;
        Ok(bboxes
            .iter()
            .map(|b| BoundingBox {
                x_min: w - b.x_max,
                x_max: w - b.x_min,
                ..*b
            })
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let w = canvas.0 as f64;
        Ok(keypoints
            .iter()
            .map(|kp| Keypoint {
                x: w - kp.x,
                angle: kp.angle.map(|a| std::f64::consts::PI - a),
                ..*kp
            })
            .collect())
    }
}

/// Mirrors the image across the horizontal axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalFlip;

impl VerticalFlip {
    /// Creates the transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for VerticalFlip {
    fn name(&self) -> &'static str {
        "vertical_flip"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        Ok(flip_image_v(image))
    }

    fn apply_to_mask(&self, mask: &Mask, _params: &SampledParams) -> ApplyResult<Mask> {
        Ok(flip_image_v(mask))
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let h = canvas.1 as f64;
        Ok(bboxes
            .iter()
            .map(|b| BoundingBox {
                y_min: h - b.y_max,
                y_max: h - b.y_min,
                ..*b
            })
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let h = canvas.1 as f64;
        Ok(keypoints
            .iter()
            .map(|kp| Keypoint {
                y: h - kp.y,
                angle: kp.angle.map(|a| -a),
                ..*kp
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hflip_moves_pixel() {
        let mut img = Image::<f32>::new(4, 3, 1);
        img.set_pixel(0, 1, &[1.0]);
        let out = HorizontalFlip::new()
            .apply(&img, &SampledParams::empty())
            .unwrap();
        assert_eq!(out.pixel(3, 1), &[1.0]);
        assert_eq!(out.pixel(0, 1), &[0.0]);
    }

    #[test]
    fn test_vflip_moves_row() {
        let mut img = Image::<f32>::new(3, 4, 2);
        img.set_pixel(1, 0, &[0.5, 0.25]);
        let out = VerticalFlip::new()
            .apply(&img, &SampledParams::empty())
            .unwrap();
        assert_eq!(out.pixel(1, 3), &[0.5, 0.25]);
    }

    #[test]
    fn test_double_flip_is_identity() {
        let mut img = Image::<f32>::new(5, 5, 3);
        img.set_pixel(1, 2, &[0.1, 0.2, 0.3]);
        let t = HorizontalFlip::new();
        let p = SampledParams::empty();
        let twice = t.apply(&t.apply(&img, &p).unwrap(), &p).unwrap();
        assert_eq!(twice, img);
    }

    #[test]
    fn test_hflip_bbox_mirrors_and_stays_ordered() {
        let boxes = vec![BoundingBox::new(2.0, 3.0, 10.0, 8.0).with_label(1)];
        let out = HorizontalFlip::new()
            .apply_to_bboxes(&boxes, (32, 32), &SampledParams::empty())
            .unwrap();
        assert_eq!(out[0].x_min, 22.0);
        assert_eq!(out[0].x_max, 30.0);
        assert_eq!(out[0].y_min, 3.0);
        assert_eq!(out[0].label, Some(1));
        assert!(out[0].validate().is_ok());
    }

    #[test]
    fn test_vflip_keypoint() {
        let kps = vec![Keypoint::new(4.0, 1.0)];
        let out = VerticalFlip::new()
            .apply_to_keypoints(&kps, (8, 8), &SampledParams::empty())
            .unwrap();
        assert_eq!(out[0].x, 4.0);
        assert_eq!(out[0].y, 7.0);
    }

    #[test]
    fn test_hflip_mask_preserves_labels() {
        let mut mask = Mask::new(4, 4, 1);
        mask.set_pixel(0, 0, &[9]);
        let out = HorizontalFlip::new()
            .apply_to_mask(&mask, &SampledParams::empty())
            .unwrap();
        assert_eq!(out.pixel(3, 0), &[9]);
    }
}
