//! Synchronized application of one transform to a target bundle.

use crate::error::PipelineError;
use crate::targets::Targets;
use aug_transforms::Transform;
use aug_sample::SampledParams;

/// Applies one transform to every present target with one parameter set.
///
/// The input canvas size is captured before the image changes and handed to
/// every coordinate companion, so size-changing transforms see consistent
/// geometry. The transform's declared `output_size` is checked against the
/// image and mask it actually produces; a disagreement would silently
/// desynchronize coordinate targets, so it aborts the step. Any failure
/// leaves the original bundle untouched because every companion produces a
/// new value.
pub(crate) fn apply_synced(
    transform: &dyn Transform,
    targets: &Targets,
    params: &SampledParams,
) -> Result<Targets, PipelineError> {
    let canvas = targets.image.dimensions();
    let declared = transform.output_size(canvas, params)?;

    let image = transform.apply(&targets.image, params)?;
    check_output_size(transform, declared, image.dimensions())?;
    let mask = targets
        .mask
        .as_ref()
        .map(|m| transform.apply_to_mask(m, params))
        .transpose()?;
    if let Some(m) = &mask {
        check_output_size(transform, declared, m.dimensions())?;
    }
    let bboxes = targets
        .bboxes
        .as_ref()
        .map(|b| transform.apply_to_bboxes(b, canvas, params))
        .transpose()?;
    let keypoints = targets
        .keypoints
        .as_ref()
        .map(|k| transform.apply_to_keypoints(k, canvas, params))
        .transpose()?;

    Ok(Targets {
        image,
        mask,
        bboxes,
        keypoints,
    })
}

fn check_output_size(
    transform: &dyn Transform,
    declared: (u32, u32),
    got: (u32, u32),
) -> Result<(), PipelineError> {
    if got != declared {
        return Err(PipelineError::OutputSizeMismatch {
            name: transform.name().to_string(),
            want_w: declared.0,
            want_h: declared.1,
            got_w: got.0,
            got_h: got.1,
        });
    }
    Ok(())
}
