//! Rotation and general affine transforms.
//!
//! Both transforms resolve their sampled parameters into a single forward
//! [`Affine2`] about the canvas center, then drive every target from that
//! matrix: the image and mask warp by inverse mapping, boxes map their
//! corners and re-clip, keypoints map as coordinates.

use crate::border::{BorderMode, Fill};
use crate::error::ApplyResult;
use crate::geom::{Affine2, warp_affine_image, warp_affine_mask};
use crate::interp::Interpolation;
use crate::transform::{TargetSupport, Transform, validate_specs};
use aug_core::{BoundingBox, Image, Keypoint, Mask};
use aug_sample::{NamedSpec, ParamSpec, SampledParams, SpecError};
use serde::{Deserialize, Serialize};

/// Configuration for [`Rotate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotateConfig {
    /// Rotation angle range in degrees; positive is counter-clockwise in
    /// math coordinates (visually clockwise with y down).
    pub limit: (f64, f64),
    /// Image resampling filter.
    pub interpolation: Interpolation,
    /// Mask resampling filter; nearest keeps labels unblended.
    pub mask_interpolation: Interpolation,
    /// How out-of-canvas samples resolve.
    pub border_mode: BorderMode,
    /// Fill for constant borders, uniform or per channel.
    pub fill: Fill,
    /// Fill label for constant borders on the mask.
    pub mask_fill: u8,
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            limit: (-90.0, 90.0),
            interpolation: Interpolation::default(),
            mask_interpolation: Interpolation::Nearest,
            border_mode: BorderMode::default(),
            fill: Fill::default(),
            mask_fill: 0,
        }
    }
}

/// Rotation about the canvas center by a sampled angle.
#[derive(Debug, Clone)]
pub struct Rotate {
    config: RotateConfig,
}

impl Rotate {
    /// Builds the transform, validating the angle range.
    pub fn new(config: RotateConfig) -> Result<Self, SpecError> {
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }

    fn forward(&self, canvas: (u32, u32), params: &SampledParams) -> ApplyResult<Affine2> {
        let radians = params.f64("angle")?.to_radians();
        Ok(Affine2::about_center(
            &Affine2::rotation(radians),
            canvas.0,
            canvas.1,
        ))
    }
}

impl Transform for Rotate {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let (lo, hi) = self.config.limit;
        vec![NamedSpec::new("angle", ParamSpec::float_range(lo, hi))]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let forward = self.forward(image.dimensions(), params)?;
        let fill = self.config.fill.resolve(image.channels())?;
        warp_affine_image(
            image,
            &forward,
            image.dimensions(),
            self.config.interpolation,
            self.config.border_mode,
            &fill,
        )
    }

    fn apply_to_mask(&self, mask: &Mask, params: &SampledParams) -> ApplyResult<Mask> {
        let forward = self.forward(mask.dimensions(), params)?;
        warp_affine_mask(
            mask,
            &forward,
            mask.dimensions(),
            self.config.mask_interpolation,
            self.config.border_mode,
            self.config.mask_fill,
        )
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let forward = self.forward(canvas, params)?;
        Ok(bboxes
            .iter()
            .map(|b| b.map_corners(|x, y| forward.apply(x, y)))
            .filter_map(|b| b.clip_to_canvas(canvas.0, canvas.1))
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let radians = params.f64("angle")?.to_radians();
        let forward = self.forward(canvas, params)?;
        Ok(keypoints
            .iter()
            .map(|kp| {
                kp.map_position(|x, y| forward.apply(x, y))
                    .rotated_by(radians)
            })
            .filter(|kp| kp.in_canvas(canvas.0, canvas.1))
            .collect())
    }
}

/// Configuration for [`Affine`].
///
/// Every component is a range the transform draws from independently;
/// degenerate ranges pin a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffineConfig {
    /// Translation ranges as fractions of canvas size, per axis.
    pub translate_percent: ((f64, f64), (f64, f64)),
    /// Uniform scale factor range; must be positive.
    pub scale: (f64, f64),
    /// Rotation angle range in degrees.
    pub rotate: (f64, f64),
    /// Shear angle range in degrees along x.
    pub shear_x: (f64, f64),
    /// Shear angle range in degrees along y.
    pub shear_y: (f64, f64),
    /// Image resampling filter.
    pub interpolation: Interpolation,
    /// Mask resampling filter; nearest keeps labels unblended.
    pub mask_interpolation: Interpolation,
    /// How out-of-canvas samples resolve.
    pub border_mode: BorderMode,
    /// Fill for constant borders, uniform or per channel.
    pub fill: Fill,
    /// Fill label for constant borders on the mask.
    pub mask_fill: u8,
}

impl Default for AffineConfig {
    fn default() -> Self {
        Self {
            translate_percent: ((0.0, 0.0), (0.0, 0.0)),
            scale: (1.0, 1.0),
            rotate: (0.0, 0.0),
            shear_x: (0.0, 0.0),
            shear_y: (0.0, 0.0),
            interpolation: Interpolation::default(),
            mask_interpolation: Interpolation::Nearest,
            border_mode: BorderMode::default(),
            fill: Fill::default(),
            mask_fill: 0,
        }
    }
}

/// Combined translate/scale/rotate/shear about the canvas center.
///
/// Components compose in a fixed order: scale, then shear, then rotation
/// (all about the center), then translation.
#[derive(Debug, Clone)]
pub struct Affine {
    config: AffineConfig,
}

impl Affine {
    /// Builds the transform.
    ///
    /// # Errors
    ///
    /// Rejects inverted ranges and non-positive scale bounds (a zero scale
    /// would be unresolvable later, so it fails here).
    pub fn new(config: AffineConfig) -> Result<Self, SpecError> {
        if config.scale.0 <= 0.0 {
            return Err(SpecError::InvalidValue {
                name: "scale".into(),
                reason: "scale must be positive".into(),
            });
        }
        let t = Self { config };
        validate_specs(&t.specs())?;
        Ok(t)
    }

    fn forward(&self, canvas: (u32, u32), params: &SampledParams) -> ApplyResult<Affine2> {
        let (w, h) = canvas;
        let (tx, ty) = params.axis_f64("translate")?;
        let scale = params.f64("scale")?;
        let radians = params.f64("angle")?.to_radians();
        let (shx, shy) = params.axis_f64("shear")?;

        let inner = Affine2::scaling(scale, scale)
            .then(&Affine2::shear(shx.to_radians(), shy.to_radians()))
            .then(&Affine2::rotation(radians));
        Ok(Affine2::about_center(&inner, w, h)
            .then(&Affine2::translation(tx * w as f64, ty * h as f64)))
    }
}

impl Transform for Affine {
    fn name(&self) -> &'static str {
        "affine"
    }

    fn specs(&self) -> Vec<NamedSpec> {
        let ((tx0, tx1), (ty0, ty1)) = self.config.translate_percent;
        vec![
            NamedSpec::new(
                "translate",
                ParamSpec::PerAxis {
                    x: Box::new(ParamSpec::float_range(tx0, tx1)),
                    y: Box::new(ParamSpec::float_range(ty0, ty1)),
                },
            ),
            NamedSpec::new(
                "scale",
                ParamSpec::float_range(self.config.scale.0, self.config.scale.1),
            ),
            NamedSpec::new(
                "angle",
                ParamSpec::float_range(self.config.rotate.0, self.config.rotate.1),
            ),
            NamedSpec::new(
                "shear",
                ParamSpec::PerAxis {
                    x: Box::new(ParamSpec::float_range(
                        self.config.shear_x.0,
                        self.config.shear_x.1,
                    )),
                    y: Box::new(ParamSpec::float_range(
                        self.config.shear_y.0,
                        self.config.shear_y.1,
                    )),
                },
            ),
        ]
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::spatial()
    }

    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>> {
        let forward = self.forward(image.dimensions(), params)?;
        let fill = self.config.fill.resolve(image.channels())?;
        warp_affine_image(
            image,
            &forward,
            image.dimensions(),
            self.config.interpolation,
            self.config.border_mode,
            &fill,
        )
    }

    fn apply_to_mask(&self, mask: &Mask, params: &SampledParams) -> ApplyResult<Mask> {
        let forward = self.forward(mask.dimensions(), params)?;
        warp_affine_mask(
            mask,
            &forward,
            mask.dimensions(),
            self.config.mask_interpolation,
            self.config.border_mode,
            self.config.mask_fill,
        )
    }

    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let forward = self.forward(canvas, params)?;
        Ok(bboxes
            .iter()
            .map(|b| b.map_corners(|x, y| forward.apply(x, y)))
            .filter_map(|b| b.clip_to_canvas(canvas.0, canvas.1))
            .collect())
    }

    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let radians = params.f64("angle")?.to_radians();
        let scale = params.f64("scale")?;
        let forward = self.forward(canvas, params)?;
        Ok(keypoints
            .iter()
            .map(|kp| {
                kp.map_position(|x, y| forward.apply(x, y))
                    .rotated_by(radians)
                    .scaled_by(scale)
            })
            .filter(|kp| kp.in_canvas(canvas.0, canvas.1))
            .collect())
    }
}
