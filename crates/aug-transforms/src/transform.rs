//! The transform trait and target-support flags.

use crate::ApplyResult;
use aug_core::{BoundingBox, Image, Keypoint, Mask};
use aug_sample::{NamedSpec, SampledParams, SpecError};

/// Validates every declaration in a spec set. Constructors call this so
/// malformed configuration fails at pipeline-build time, not sample time.
pub(crate) fn validate_specs(specs: &[NamedSpec]) -> Result<(), SpecError> {
    for s in specs {
        s.spec.validate(&s.name)?;
    }
    Ok(())
}

/// Which auxiliary targets a transform actually moves.
///
/// Declared at registration time. Companions for unsupported targets are
/// identity no-ops, so these flags are capability metadata: a caller can ask
/// whether a pipeline will touch its masks before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetSupport {
    /// Moves mask pixels.
    pub mask: bool,
    /// Moves bounding boxes.
    pub bboxes: bool,
    /// Moves keypoints.
    pub keypoints: bool,
}

impl TargetSupport {
    /// A pixel-value transform: targets pass through untouched.
    pub const fn pixel_only() -> Self {
        Self {
            mask: false,
            bboxes: false,
            keypoints: false,
        }
    }

    /// A spatial transform: every target moves with the image.
    pub const fn spatial() -> Self {
        Self {
            mask: true,
            bboxes: true,
            keypoints: true,
        }
    }
}

/// A single configured augmentation operation.
///
/// Implementations are immutable configuration, constructed once at
/// pipeline-build time. All per-invocation state arrives through
/// [`SampledParams`], produced once per invocation and shared across the
/// image call and every companion — the same geometric decision is never
/// resampled per target.
///
/// Per-pixel randomness (noise fields, channel permutations) is derived
/// from a sampled integer seed parameter, so it too is identical across
/// repeated calls with the same [`SampledParams`].
pub trait Transform: Send + Sync {
    /// Stable identifier, also the registry key.
    fn name(&self) -> &'static str;

    /// Parameter declarations resolved once per invocation.
    ///
    /// Transforms with nothing to sample return an empty set.
    fn specs(&self) -> Vec<NamedSpec> {
        Vec::new()
    }

    /// Which targets this transform moves.
    fn supports(&self) -> TargetSupport;

    /// Output canvas size for a given input size and parameter set.
    ///
    /// Size-changing transforms (crop, resize, pad) override this so the
    /// pipeline can rescale and clip coordinate targets to the new extent.
    /// The pipeline checks the produced image and mask against the declared
    /// size and aborts the step on a disagreement.
    fn output_size(&self, input: (u32, u32), params: &SampledParams) -> ApplyResult<(u32, u32)> {
        let _ = params;
        Ok(input)
    }

    /// Applies the transform to the image, returning a new image.
    fn apply(&self, image: &Image<f32>, params: &SampledParams) -> ApplyResult<Image<f32>>;

    /// Applies the transform to a mask with the same sampled parameters.
    ///
    /// Default: identity (pixel-value transforms leave masks untouched).
    fn apply_to_mask(&self, mask: &Mask, params: &SampledParams) -> ApplyResult<Mask> {
        let _ = params;
        Ok(mask.clone())
    }

    /// Applies the transform to bounding boxes in absolute pixels.
    ///
    /// `canvas` is the input canvas size (width, height). Default: identity.
    fn apply_to_bboxes(
        &self,
        bboxes: &[BoundingBox],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<BoundingBox>> {
        let _ = (canvas, params);
        Ok(bboxes.to_vec())
    }

    /// Applies the transform to keypoints in absolute pixels.
    ///
    /// `canvas` is the input canvas size (width, height). Default: identity.
    fn apply_to_keypoints(
        &self,
        keypoints: &[Keypoint],
        canvas: (u32, u32),
        params: &SampledParams,
    ) -> ApplyResult<Vec<Keypoint>> {
        let _ = (canvas, params);
        Ok(keypoints.to_vec())
    }
}

/// The identity transform.
///
/// Useful as a pipeline placeholder and as the degenerate case in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOp;

impl NoOp {
    /// Creates the identity transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for NoOp {
    fn name(&self) -> &'static str {
        "no_op"
    }

    fn supports(&self) -> TargetSupport {
        TargetSupport::pixel_only()
    }

    fn apply(&self, image: &Image<f32>, _params: &SampledParams) -> ApplyResult<Image<f32>> {
        Ok(image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_identity() {
        let img: Image<f32> = Image::filled(4, 4, 3, &[0.1, 0.2, 0.3]);
        let out = NoOp::new().apply(&img, &SampledParams::empty()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_default_companions_are_identity() {
        let noop = NoOp::new();
        let mask: Mask = Mask::filled(4, 4, 1, &[5]);
        let boxes = vec![BoundingBox::new(0.0, 0.0, 2.0, 2.0)];
        let kps = vec![Keypoint::new(1.0, 1.0)];
        let params = SampledParams::empty();

        assert_eq!(noop.apply_to_mask(&mask, &params).unwrap(), mask);
        assert_eq!(
            noop.apply_to_bboxes(&boxes, (4, 4), &params).unwrap(),
            boxes
        );
        assert_eq!(
            noop.apply_to_keypoints(&kps, (4, 4), &params).unwrap(),
            kps
        );
    }
}
