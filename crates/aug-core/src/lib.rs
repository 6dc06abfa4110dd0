//! # aug-core
//!
//! Core types for image augmentation pipelines.
//!
//! This crate provides the foundational types used throughout the AUG-RS
//! workspace:
//!
//! - [`Image`] - Dense row-major pixel buffer with copy-on-write storage
//! - [`Mask`] - Integer-labeled segmentation mask paired with an image
//! - [`BoundingBox`] - Axis-aligned box with optional class label
//! - [`Keypoint`] - 2D point with optional angle and scale
//! - [`PixelFormat`] - Trait for pixel component types (u8, u16, f16, f32)
//! - [`Rect`] - Rectangle arithmetic for crops and pads
//!
//! ## Target model
//!
//! An augmentation moves an image together with its *targets*: any data that
//! must stay geometrically consistent with the pixels. The types here carry
//! no transform logic of their own; `aug-transforms` operates on them and
//! `aug-pipeline` threads them through a chain.
//!
//! ## Crate structure
//!
//! This crate is the foundation of the workspace and has no internal
//! dependencies:
//!
//! ```text
//! aug-core (this crate)
//!    ^
//!    |
//!    +-- aug-sample (parameter declarations and sampling)
//!    +-- aug-transforms (pixel and spatial operations)
//!    +-- aug-pipeline (composition and synchronization)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bbox;
pub mod error;
pub mod image;
pub mod keypoint;
pub mod pixel;
pub mod rect;

pub use bbox::BoundingBox;
pub use error::{Error, Result};
pub use image::{Image, Mask};
pub use keypoint::Keypoint;
pub use pixel::PixelFormat;
pub use rect::Rect;
