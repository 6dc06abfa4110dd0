//! # aug-sample
//!
//! Parameter declarations and sampling for augmentation transforms.
//!
//! A transform declares *what* it randomizes as a set of [`ParamSpec`]s:
//! ranges, weighted choices, per-axis pairs, nested maps, and conditional
//! groups. At invocation time the sampler resolves every declaration into
//! one concrete [`ParamValue`] using an explicit random-source handle,
//! producing an immutable [`SampledParams`] map that is shared across the
//! image and every auxiliary target.
//!
//! ## Fail-fast contract
//!
//! Malformed declarations (inverted bounds, bad weights) are rejected at
//! build time by [`ParamSpec::validate`] with a [`SpecError`]. Failures
//! that only materialize while drawing (an empty choice list, a missing
//! lookup) surface as [`SampleError`] and abort the invocation. Nothing is
//! clamped or defaulted silently.
//!
//! ## Example
//!
//! ```
//! use aug_sample::{NamedSpec, ParamSpec, sample_specs};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let specs = vec![
//!     NamedSpec::new("angle", ParamSpec::float_range(-90.0, 90.0)),
//!     NamedSpec::new("ksize", ParamSpec::int_range(3, 7)),
//! ];
//! for s in &specs {
//!     s.spec.validate(&s.name).unwrap();
//! }
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let params = sample_specs(&specs, &mut rng).unwrap();
//! let angle = params.f64("angle").unwrap();
//! assert!((-90.0..=90.0).contains(&angle));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod params;
pub mod sampler;
pub mod spec;
pub mod value;

pub use error::{SampleError, SpecError};
pub use params::SampledParams;
pub use sampler::{resolve, sample_specs};
pub use spec::{NamedSpec, ParamSpec};
pub use value::ParamValue;
