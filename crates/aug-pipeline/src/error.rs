//! Error types for pipeline construction and execution.

use aug_sample::{SampleError, SpecError};
use aug_transforms::ApplyError;
use thiserror::Error;

/// Error raised while building a pipeline from configuration.
///
/// Everything here fails before any image is touched: a config that builds
/// can only fail later for sample- or apply-time reasons.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid YAML.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A transform name has no registry entry.
    #[error("unknown transform '{name}'")]
    UnknownTransform {
        /// The unrecognized identifier.
        name: String,
    },

    /// A transform's parameter block does not match its config shape.
    #[error("invalid params for '{name}': {source}")]
    BadParams {
        /// Transform identifier.
        name: String,
        /// Underlying deserialization failure.
        source: serde_yaml::Error,
    },

    /// A transform rejected its configuration.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// A step probability outside [0, 1].
    #[error("invalid probability {value} for '{name}'")]
    InvalidProbability {
        /// Transform identifier.
        name: String,
        /// The offending value.
        value: f64,
    },

    /// A composition mode that cannot run without steps.
    #[error("one_of composition requires at least one step with positive probability")]
    EmptyChoiceComposition,
}

/// Error raised while running a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Build-time failure surfaced through a run entry point.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Parameter sampling failed.
    #[error(transparent)]
    Sample(#[from] SampleError),

    /// A transform failed to apply.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// A transform produced a canvas that differs from the size it
    /// declared through `output_size`.
    #[error("'{name}' declared a {want_w}x{want_h} output but produced {got_w}x{got_h}")]
    OutputSizeMismatch {
        /// Transform identifier.
        name: String,
        /// Declared width.
        want_w: u32,
        /// Declared height.
        want_h: u32,
        /// Produced width.
        got_w: u32,
        /// Produced height.
        got_h: u32,
    },

    /// Mask extent does not match the image it is paired with.
    #[error("mask is {got_w}x{got_h} but image is {want_w}x{want_h}")]
    TargetMismatch {
        /// Expected width (image).
        want_w: u32,
        /// Expected height (image).
        want_h: u32,
        /// Actual width (mask).
        got_w: u32,
        /// Actual height (mask).
        got_h: u32,
    },
}
