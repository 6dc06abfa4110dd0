//! Target bundles.
//!
//! A [`Targets`] value groups an image with whatever auxiliary annotations
//! travel with it. The pipeline transforms the whole bundle with one set of
//! sampled parameters per step, so annotations never drift from the pixels.

use aug_core::{BoundingBox, Image, Keypoint, Mask};
use serde::{Deserialize, Serialize};

/// Which coordinate convention boxes and keypoints arrive in.
///
/// Transforms always see absolute pixels; a pipeline configured for
/// normalized coordinates converts on entry and back on exit using the
/// current canvas size at each end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Pixel coordinates.
    #[default]
    Absolute,
    /// Coordinates as fractions of canvas size in [0, 1].
    Normalized,
}

/// An image and its synchronized annotation targets.
///
/// # Example
///
/// ```
/// use aug_core::{BoundingBox, Image};
/// use aug_pipeline::Targets;
///
/// let targets = Targets::new(Image::new(64, 64, 3))
///     .with_bboxes(vec![BoundingBox::new(8.0, 8.0, 32.0, 32.0)]);
/// assert!(targets.mask.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Targets {
    /// The image, always present.
    pub image: Image<f32>,
    /// Optional segmentation mask with the same extent as the image.
    pub mask: Option<Mask>,
    /// Optional bounding boxes.
    pub bboxes: Option<Vec<BoundingBox>>,
    /// Optional keypoints.
    pub keypoints: Option<Vec<Keypoint>>,
}

impl Targets {
    /// Creates a bundle holding only an image.
    pub fn new(image: Image<f32>) -> Self {
        Self {
            image,
            mask: None,
            bboxes: None,
            keypoints: None,
        }
    }

    /// Attaches a segmentation mask.
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Attaches bounding boxes.
    pub fn with_bboxes(mut self, bboxes: Vec<BoundingBox>) -> Self {
        self.bboxes = Some(bboxes);
        self
    }

    /// Attaches keypoints.
    pub fn with_keypoints(mut self, keypoints: Vec<Keypoint>) -> Self {
        self.keypoints = Some(keypoints);
        self
    }

    /// Converts coordinate targets from normalized to absolute pixels
    /// against the current canvas.
    pub(crate) fn coords_to_absolute(&mut self) {
        let (w, h) = self.image.dimensions();
        if let Some(bboxes) = &mut self.bboxes {
            for b in bboxes.iter_mut() {
                *b = b.to_absolute(w, h);
            }
        }
        if let Some(kps) = &mut self.keypoints {
            for kp in kps.iter_mut() {
                *kp = kp.to_absolute(w, h);
            }
        }
    }

    /// Converts coordinate targets from absolute pixels to normalized
    /// against the current canvas.
    pub(crate) fn coords_to_normalized(&mut self) {
        let (w, h) = self.image.dimensions();
        if let Some(bboxes) = &mut self.bboxes {
            for b in bboxes.iter_mut() {
                *b = b.to_normalized(w, h);
            }
        }
        if let Some(kps) = &mut self.keypoints {
            for kp in kps.iter_mut() {
                *kp = kp.to_normalized(w, h);
            }
        }
    }
}
