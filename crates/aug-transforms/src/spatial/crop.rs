//! Crop transforms.
//!
//! A crop is a rectangle copy: no resampling, no border handling. The crop
//! origin is the only sampled decision, encoded as per-axis fractions so
//! the same parameter set places the window identically on the image, the
//! mask, and every coordinate target.

use crate::error::{ApplyError, ApplyResult};
use crate::transform::{TargetSupport, Transform, validate_specs};
use aug_core::{BoundingBox, Image, Keypoint, Mask, PixelFormat, Rect};
use aug_sample::{NamedSpec, ParamSpec, SampledParams, SpecError};
use serde::{Deserialize, Serialize};

/// Configuration for [`RandomCrop`] and [`CenterCrop`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropConfig {
    /// Crop height in pixels.
    pub height: u32,
    /// Crop width in pixels.
    pub width: u32,
}

impl CropConfig {
    fn validate(&self) -> Result<(), SpecError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpecError::InvalidValue {
                name: "crop".into(),
                reason: format!("crop {}x{} has zero area", self.width, self.height),
            });
        }
        Ok(())
    }
}

/// Extracts `rect` from the image.
///
/// # Errors
///
/// Returns [`ApplyError::InvalidGeometry`] if the rectangle does not fit
/// inside the image.
pub(crate) fn crop_image<T: PixelFormat>(src: &Image<T>, rect: Rect) -> ApplyResult<Image<T>> {
    let (w, h) = src.dimensions();
    if !rect.fits_in(w, h) {
        return Err(ApplyError::InvalidGeometry(format!(
            "crop {}x{} at ({}, {}) exceeds {}x{} canvas",
            rect.width, rect.height, rect.x, rect.y, w, h
        )));
    }
    let ch = src.channels() as usize;
    let row_len = rect.width as usize * ch;
    let mut out = Image::new(rect.width, rect.height, src.channels());
    {
        let data = out.data_mut();
        for y in 0..rect.height {
            let src_row = src.row(rect.y + y);
            let s = rect.x as usize * ch;
            let d = y as usize * row_len;
            data[d..d + row_len].copy_from_slice(&src_row[s..s + row_len]);
        }
    }
    Ok(out)
}

/// Shared companion arithmetic: crops either fit or error.
fn crop_guard(canvas: (u32, u32), config: &CropConfig) -> ApplyResult<()> {
    if config.width > canvas.0 || config.height > canvas.1 {
        return Err(ApplyError::InvalidGeometry(format!(
            "crop {}x{} exceeds {}x{} input",
            config.width, config.height, canvas.0, canvas.1
        )));
    }
    Ok(())
}

fn shift_bboxes(
    bboxes: &[BoundingBox],
    origin: (u32, u32),
    out: (u32, u32),
) -> Vec<BoundingBox> {
    let (dx, dy) = (origin.0 as f64, origin.1 as f64);
    bboxes
        .iter()
        .map(|b| BoundingBox {
            x_min: b.x_min - dx,
            y_min: b.y_min - dy,
            x_max: b.x_max - dx,
            y_max: b.y_max - dy,
            label: b.label,
        })
        .filter_map(|b| b.clip_to_canvas(out.0, out.1))
        .collect()
}

fn shift_keypoints(
    keypoints: &[Keypoint],
    origin: (u32, u32),
    out: (u32, u32),
) -> Vec<Keypoint> {
    let (dx, dy) = (origin.0 as f64, origin.1 as f64);
    keypoints
        .iter()
        .map(|kp| kp.map_position(|x, y| (x - dx, y - dy)))
        .filter(|kp| kp.in_canvas(out.0, out.1))
        .collect()
}

/// Crops a window of fixed size at a sampled position.
#[derive(Debug, Clone)]
pub struct RandomCrop {
    config: CropConfig,
}

impl RandomCrop {
    /// Builds the transform.
    pub fn new(config: CropConfig) -> Result<Self, SpecError> {
        config.validate()?;
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }

    /// Resolves the sampled fractions into a pixel origin for this canvas.
    ///
    /// The fraction picks uniformly over the valid origin positions, so a
    /// fraction of 0 pins the window to the top-left and anything below 1
    /// keeps it inside the canvas.
    fn origin(&self, canvas: (u32, u32), params: &SampledParams) -> ApplyResult<(u32, u32)> {
        crop_guard(canvas, &self.config)?;
        let max_x = canvas.0 - self.config.width;
        let max_y = canvas.1 - self.config.height;
        let x_frac = params.f64("x_frac")?;
        let y_frac = params.f64("y_frac")?;
        let x = ((x_frac * (max_x as f64 + 1.0)) as u32).min(max_x);
        let y = ((y_frac * (max_y as f64 + 1.0)) as u32).min(max_y);
        Ok((x, y))
    }
}

impl Transform for RandomCrop {
    fn name(&self) -> &'static str {
        "random_crop"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        vec![
            NamedSpec::new("x_frac", ParamSpec::float_range(0.0, 1.0)),
            NamedSpec::new("y_frac", ParamSpec::float_range(0.0, 1.0)),
        ]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn output_size(&self, input: (u32, u32), params: &SampledParams) -> ApplyResult<(u32, u32)> {
        let _ = self.origin(input, params)?;
        Ok((self.config.width, self.config.height))
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let (x, y) = self.origin(image.dimensions(), params)?;
        crop_image(
            image,
            Rect::new(x, y, self.config.width, self.config.height),
        )
    }

    fn apply_to_mask(&self, mask: &Mask, params: &SampledParams) -> ApplyResult<Mask> {
        let (x, y) = self.origin(mask.dimensions(), params)?;
        crop_image(mask, Rect::new(x, y, self.config.width, self.config.height))
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let origin = self.origin(canvas, params)?;
        Ok(shift_bboxes(
            bboxes,
            origin,
            (self.config.width, self.config.height),
        ))
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let origin = self.origin(canvas, params)?;
        Ok(shift_keypoints(
            keypoints,
            origin,
            (self.config.width, self.config.height),
        ))
    }
}

/// Crops a window of fixed size centered on the canvas.
#[derive(Debug, Clone)]
pub struct CenterCrop {
    config: CropConfig,
}

impl CenterCrop {
    /// Builds the transform.
    pub fn new(config: CropConfig) -> Result<Self, SpecError> {
        config.validate()?;
        Ok(Self { config })
    }

    fn origin(&self, canvas: (u32, u32)) -> ApplyResult<(u32, u32)> {
        crop_guard(canvas, &self.config)?;
        Ok((
            (canvas.0 - self.config.width) / 2,
            (canvas.1 - self.config.height) / 2,
        ))
    }
}

impl Transform for CenterCrop {
    fn name(&self) -> &'static str {
        "center_crop"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn output_size(&self, input: (u32, u32), _params: &SampledParams) -> ApplyResult<(u32, u32)> {
        let _ = self.origin(input)?;
        Ok((self.config.width, self.config.height))
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        let (x, y) = self.origin(image.dimensions())?;
        crop_image(
            image,
            Rect::new(x, y, self.config.width, self.config.height),
        )
    }

    fn apply_to_mask(&self, mask: &Mask, _params: &SampledParams) -> ApplyResult<Mask> {
        let (x, y) = self.origin(mask.dimensions())?;
        crop_image(mask, Rect::new(x, y, self.config.width, self.config.height))
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let origin = self.origin(canvas)?;
        Ok(shift_bboxes(
            bboxes,
            origin,
            (self.config.width, self.config.height),
        ))
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        _params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let origin = self.origin(canvas)?;
        Ok(shift_keypoints(
            keypoints,
            origin,
            (self.config.width, self.config.height),
        ))
    }
}
