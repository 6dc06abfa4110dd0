//! Spatial transforms.
//!
//! These change pixel positions, so every auxiliary target moves with the
//! image: masks re-warp with their own filter (nearest by default),
//! bounding boxes map their corners and re-clip to the output canvas,
//! keypoints map as coordinates. All companions for one invocation consume
//! the same sampled parameter set.

mod affine;
mod crop;
mod flip;
mod pad;
mod resize;

pub use affine::{Affine, AffineConfig, Rotate, RotateConfig};
pub use crop::{CenterCrop, CropConfig, RandomCrop};
pub use flip::{HorizontalFlip, VerticalFlip};
pub use pad::{PadIfNeeded, PadIfNeededConfig, PadPosition};
pub use resize::{Resize, ResizeConfig};
