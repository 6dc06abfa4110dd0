//! Pipeline composition and execution.

use crate::error::{ConfigError, PipelineError};
use crate::sync::apply_synced;
use crate::targets::{CoordinateSpace, Targets};
use aug_sample::sample_specs;
use aug_transforms::{ApplyError, Transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a pipeline's steps combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// Every step runs in declaration order, each gated by its own
    /// activation probability.
    #[default]
    Sequential,
    /// Exactly one step runs per invocation, chosen with probabilities as
    /// relative weights.
    OneOf,
}

/// One configured pipeline step.
pub struct Step {
    /// The transform to run.
    pub transform: Box<dyn Transform>,
    /// Activation probability in [0, 1] (sequential mode) or relative
    /// weight (one-of mode).
    pub probability: f64,
}

impl Step {
    /// Creates a step that always runs.
    pub fn new(transform: Box<dyn Transform>) -> Self {
        Self {
            transform,
            probability: 1.0,
        }
    }

    /// Sets the activation probability.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("transform", &self.transform.name())
            .field("probability", &self.probability)
            .finish()
    }
}

/// An executable augmentation pipeline.
///
/// Built once (from code or from [`crate::PipelineConfig`]) and reused
/// across invocations. Each invocation takes an explicit seed or random
/// handle; the same seed on the same input produces bit-identical output.
#[derive(Debug)]
pub struct Compose {
    mode: CompositionMode,
    coordinate_space: CoordinateSpace,
    steps: Vec<Step>,
}

impl Compose {
    /// Builds a pipeline from steps.
    ///
    /// # Errors
    ///
    /// Rejects probabilities outside [0, 1], and a one-of pipeline whose
    /// weights sum to zero (it could never pick a step).
    pub fn new(mode: CompositionMode, steps: Vec<Step>) -> Result<Self, ConfigError> {
        for step in &steps {
            let p = step.probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability {
                    name: step.transform.name().to_string(),
                    value: p,
                });
            }
        }
        if mode == CompositionMode::OneOf
            && steps.iter().map(|s| s.probability).sum::<f64>() <= 0.0
        {
            return Err(ConfigError::EmptyChoiceComposition);
        }
        Ok(Self {
            mode,
            coordinate_space: CoordinateSpace::default(),
            steps,
        })
    }

    /// Sets the coordinate convention boxes and keypoints arrive in.
    pub fn with_coordinate_space(mut self, space: CoordinateSpace) -> Self {
        self.coordinate_space = space;
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the pipeline with a fresh random source seeded from `seed`.
    pub fn apply(&self, targets: Targets, seed: u64) -> Result<Targets, PipelineError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.apply_with_rng(targets, &mut rng)
    }

    /// Runs the pipeline against a caller-owned random source.
    pub fn apply_with_rng<R: Rng>(
        &self,
        targets: Targets,
        rng: &mut R,
    ) -> Result<Targets, PipelineError> {
        self.check_entry(&targets)?;
        let mut current = targets;
        if self.coordinate_space == CoordinateSpace::Normalized {
            current.coords_to_absolute();
        }

        match self.mode {
            CompositionMode::Sequential => {
                for step in &self.steps {
                    if rng.gen_bool(step.probability) {
                        current = self.run_step(step, current, rng)?;
                    } else {
                        debug!(transform = step.transform.name(), "skipped");
                    }
                }
            }
            CompositionMode::OneOf => {
                let step = &self.steps[self.pick_weighted(rng)];
                current = self.run_step(step, current, rng)?;
            }
        }

        if self.coordinate_space == CoordinateSpace::Normalized {
            current.coords_to_normalized();
        }
        Ok(current)
    }

    fn run_step<R: Rng>(
        &self,
        step: &Step,
        targets: Targets,
        rng: &mut R,
    ) -> Result<Targets, PipelineError> {
        let params = sample_specs(&step.transform.specs(), rng)?;
        debug!(
            transform = step.transform.name(),
            params = params.len(),
            "applying"
        );
        apply_synced(step.transform.as_ref(), &targets, &params)
    }

    fn pick_weighted<R: Rng>(&self, rng: &mut R) -> usize {
        let total: f64 = self.steps.iter().map(|s| s.probability).sum();
        let draw = rng.gen_range(0.0..total);
        let mut acc = 0.0;
        for (i, step) in self.steps.iter().enumerate() {
            acc += step.probability;
            if draw < acc {
                return i;
            }
        }
        self.steps.len() - 1
    }

    /// Entry validation: the mask extent must match the image, and boxes
    /// must be well-formed before any geometry runs.
    fn check_entry(&self, targets: &Targets) -> Result<(), PipelineError> {
        let (w, h) = targets.image.dimensions();
        if let Some(mask) = &targets.mask {
            let (mw, mh) = mask.dimensions();
            if (mw, mh) != (w, h) {
                return Err(PipelineError::TargetMismatch {
                    want_w: w,
                    want_h: h,
                    got_w: mw,
                    got_h: mh,
                });
            }
        }
        if let Some(bboxes) = &targets.bboxes {
            for b in bboxes {
                b.validate().map_err(ApplyError::from)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aug_core::{BoundingBox, Image, Mask};
    use aug_transforms::NoOp;
    use aug_transforms::pixel::InvertImg;
    use aug_transforms::spatial::HorizontalFlip;

    fn always(t: Box<dyn Transform>) -> Step {
        Step::new(t)
    }

    #[test]
    fn test_rejects_bad_probability() {
        let steps = vec![always(Box::new(NoOp::new())).with_probability(1.5)];
        assert!(matches!(
            Compose::new(CompositionMode::Sequential, steps),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_one_of_needs_positive_weight() {
        let steps = vec![always(Box::new(NoOp::new())).with_probability(0.0)];
        assert!(matches!(
            Compose::new(CompositionMode::OneOf, steps),
            Err(ConfigError::EmptyChoiceComposition)
        ));
    }

    #[test]
    fn test_zero_probability_step_never_runs() {
        let steps = vec![always(Box::new(InvertImg::new())).with_probability(0.0)];
        let pipeline = Compose::new(CompositionMode::Sequential, steps).unwrap();
        let img = Image::<f32>::filled(4, 4, 3, &[0.2, 0.4, 0.6]);
        let out = pipeline.apply(Targets::new(img.clone()), 1).unwrap();
        assert_eq!(out.image, img);
    }

    #[test]
    fn test_sequential_runs_in_order() {
        // Flip twice: identity. Order and activation are deterministic at p=1.
        let steps = vec![
            always(Box::new(HorizontalFlip::new())),
            always(Box::new(HorizontalFlip::new())),
        ];
        let pipeline = Compose::new(CompositionMode::Sequential, steps).unwrap();
        let mut img = Image::<f32>::new(4, 4, 1);
        img.set_pixel(0, 0, &[1.0]);
        let out = pipeline.apply(Targets::new(img.clone()), 9).unwrap();
        assert_eq!(out.image, img);
    }

    #[test]
    fn test_one_of_runs_exactly_one() {
        let steps = vec![
            always(Box::new(InvertImg::new())).with_probability(0.5),
            always(Box::new(NoOp::new())).with_probability(0.5),
        ];
        let pipeline = Compose::new(CompositionMode::OneOf, steps).unwrap();
        let img = Image::<f32>::filled(2, 2, 1, &[0.25]);
        for seed in 0..20 {
            let out = pipeline.apply(Targets::new(img.clone()), seed).unwrap();
            let v = out.image.pixel(0, 0)[0];
            // Either inverted or untouched, never both or neither.
            assert!(v == 0.25 || v == 0.75);
        }
    }

    #[test]
    fn test_mask_size_mismatch_rejected() {
        let pipeline = Compose::new(
            CompositionMode::Sequential,
            vec![always(Box::new(NoOp::new()))],
        )
        .unwrap();
        let targets = Targets::new(Image::new(8, 8, 3)).with_mask(Mask::new(4, 4, 1));
        assert!(matches!(
            pipeline.apply(targets, 0),
            Err(PipelineError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_bbox_rejected_at_entry() {
        let pipeline = Compose::new(
            CompositionMode::Sequential,
            vec![always(Box::new(NoOp::new()))],
        )
        .unwrap();
        let targets = Targets::new(Image::new(8, 8, 3))
            .with_bboxes(vec![BoundingBox::new(5.0, 0.0, 1.0, 4.0)]);
        assert!(pipeline.apply(targets, 0).is_err());
    }

    #[test]
    fn test_normalized_space_roundtrip() {
        let pipeline = Compose::new(
            CompositionMode::Sequential,
            vec![always(Box::new(HorizontalFlip::new()))],
        )
        .unwrap()
        .with_coordinate_space(CoordinateSpace::Normalized);
        let targets = Targets::new(Image::new(32, 32, 1))
            .with_bboxes(vec![BoundingBox::new(0.0, 0.0, 0.25, 0.25)]);
        let out = pipeline.apply(targets, 0).unwrap();
        let b = &out.bboxes.as_ref().unwrap()[0];
        assert!((b.x_min - 0.75).abs() < 1e-12);
        assert!((b.x_max - 1.0).abs() < 1e-12);
    }
}
