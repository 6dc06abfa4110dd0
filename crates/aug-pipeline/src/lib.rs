//! # aug-pipeline
//!
//! Declarative composition and execution of augmentation pipelines.
//!
//! A pipeline is an ordered list of transforms, each with an activation
//! probability, built either in code via [`Compose`] or from YAML via
//! [`PipelineConfig`]. Each invocation takes a [`Targets`] bundle (image
//! plus optional mask, boxes, keypoints) and an explicit seed; every
//! transform that activates samples its parameters once and applies them to
//! all present targets, so annotations never drift from the pixels.
//!
//! # Example
//!
//! ```
//! use aug_core::{BoundingBox, Image};
//! use aug_pipeline::{PipelineConfig, Targets};
//!
//! let config = PipelineConfig::from_yaml("
//! transforms:
//!   - name: rotate
//!     params: {limit: [-30, 30]}
//!   - name: resize
//!     params: {height: 64, width: 64}
//! ").unwrap();
//! let pipeline = config.build().unwrap();
//!
//! let targets = Targets::new(Image::new(32, 32, 3))
//!     .with_bboxes(vec![BoundingBox::new(0.0, 0.0, 16.0, 16.0)]);
//! let out = pipeline.apply(targets, 42).unwrap();
//! assert_eq!(out.image.dimensions(), (64, 64));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod compose;
pub mod config;
mod error;
pub mod registry;
mod sync;
pub mod targets;

pub use compose::{Compose, CompositionMode, Step};
pub use config::{PipelineConfig, TransformEntry};
pub use error::{ConfigError, PipelineError};
pub use registry::{build_transform, registered_names};
pub use targets::{CoordinateSpace, Targets};
