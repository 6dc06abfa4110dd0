//! # aug-transforms
//!
//! Pixel-level and spatial augmentation transforms.
//!
//! Every transform implements the [`Transform`] trait: a pure function from
//! (image, sampled parameters) to a new image, plus companion functions for
//! masks, bounding boxes, and keypoints that take the *same* sampled
//! parameters. A transform that does not support a companion leaves that
//! target untouched — the default implementations are identity.
//!
//! Two families:
//!
//! - **Pixel transforms** ([`pixel`]) operate on pixel values only. Spatial
//!   extent and every auxiliary target are unaffected.
//! - **Spatial transforms** ([`spatial`]) move coordinates. One coordinate
//!   mapping drives the image warp, the mask warp (own filter, nearest by
//!   default so label integers survive), bounding-box corners, and
//!   keypoints.
//!
//! # Example
//!
//! ```
//! use aug_sample::sample_specs;
//! use aug_transforms::spatial::{Rotate, RotateConfig};
//! use aug_transforms::Transform;
//! use aug_core::Image;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let rotate = Rotate::new(RotateConfig {
//!     limit: (-30.0, 30.0),
//!     ..Default::default()
//! }).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let params = sample_specs(&rotate.specs(), &mut rng).unwrap();
//! let img: Image<f32> = Image::new(32, 32, 3);
//! let out = rotate.apply(&img, &params).unwrap();
//! assert_eq!(out.dimensions(), (32, 32));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod border;
pub mod geom;
pub mod interp;
pub mod pixel;
pub mod spatial;
pub mod transform;

pub use border::{BorderMode, Fill};
pub use error::{ApplyError, ApplyResult};
pub use interp::Interpolation;
pub use transform::{NoOp, TargetSupport, Transform};
