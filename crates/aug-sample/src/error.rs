//! Error types for parameter declaration and sampling.
//!
//! Two layers, matching when the failure can be detected:
//!
//! - [`SpecError`] - the declaration itself is malformed; raised at
//!   pipeline-build time by [`crate::ParamSpec::validate`].
//! - [`SampleError`] - a valid declaration cannot produce a value, or a
//!   sampled parameter is looked up wrongly; raised at sample time and
//!   aborts the single invocation.

use thiserror::Error;

/// A parameter declaration is malformed. Build-time error.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Range declared with `low > high`.
    #[error("parameter '{name}': inverted bounds ({low} > {high})")]
    InvertedBounds {
        /// Parameter name.
        name: String,
        /// Declared lower bound.
        low: f64,
        /// Declared upper bound.
        high: f64,
    },

    /// Range bound is NaN or infinite.
    #[error("parameter '{name}': non-finite bound")]
    NonFiniteBound {
        /// Parameter name.
        name: String,
    },

    /// Choice weights do not line up with the options.
    #[error("parameter '{name}': bad weights ({reason})")]
    BadWeights {
        /// Parameter name.
        name: String,
        /// What is wrong with the weight list.
        reason: String,
    },

    /// Declared value cannot represent the bound (e.g. negative size).
    #[error("parameter '{name}': {reason}")]
    InvalidValue {
        /// Parameter name.
        name: String,
        /// Why the value is unrepresentable.
        reason: String,
    },
}

/// A declaration cannot produce a value, or a lookup failed. Sample-time
/// error; aborts the invocation.
#[derive(Debug, Error)]
pub enum SampleError {
    /// A choice spec has no options to draw from.
    #[error("parameter '{name}': choice list is empty")]
    EmptyChoice {
        /// Parameter name.
        name: String,
    },

    /// A transform asked for a parameter that was never sampled.
    #[error("missing parameter '{0}'")]
    Missing(String),

    /// A sampled value was looked up with the wrong type.
    #[error("parameter '{name}': expected {expected}, got {got}")]
    WrongType {
        /// Parameter name.
        name: String,
        /// Type the caller asked for.
        expected: &'static str,
        /// Type actually stored.
        got: &'static str,
    },
}
