//! Parameter declarations.
//!
//! A [`ParamSpec`] describes the shape a parameter is drawn from; a
//! [`NamedSpec`] attaches the name it is stored under in the sampled set.
//! Validation happens once at pipeline-build time — a spec that passes
//! [`ParamSpec::validate`] can only fail later if a choice list is empty.

use crate::error::SpecError;
use crate::value::ParamValue;

/// A parameter declaration bound to its name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSpec {
    /// Name the resolved value is stored under.
    pub name: String,
    /// The declaration itself.
    pub spec: ParamSpec,
}

impl NamedSpec {
    /// Creates a named declaration.
    pub fn new(name: impl Into<String>, spec: ParamSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

/// Declaration of how one parameter is resolved.
///
/// # Example
///
/// ```
/// use aug_sample::{ParamSpec, ParamValue};
///
/// // A degenerate range is just the value itself.
/// let fixed = ParamSpec::float_range(0.5, 0.5);
/// fixed.validate("alpha").unwrap();
///
/// // Inverted bounds fail at build time.
/// let bad = ParamSpec::int_range(10, 3);
/// assert!(bad.validate("ksize").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSpec {
    /// A bare value, returned unchanged (degenerate distribution).
    Fixed(ParamValue),

    /// Uniform integer draw, inclusive of both ends.
    IntRange {
        /// Lower bound (inclusive).
        low: i64,
        /// Upper bound (inclusive).
        high: i64,
    },

    /// Uniform float draw over `[low, high)`; a degenerate range returns
    /// the bound.
    FloatRange {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// Discrete choice, uniform or weighted.
    Choice {
        /// Values to draw from.
        options: Vec<ParamValue>,
        /// Optional weights, one per option, non-negative, not all zero.
        weights: Option<Vec<f64>>,
    },

    /// Independent declarations per axis; resolves to a map with `x` and
    /// `y` entries.
    PerAxis {
        /// Declaration for the x axis.
        x: Box<ParamSpec>,
        /// Declaration for the y axis.
        y: Box<ParamSpec>,
    },

    /// A group of named sub-declarations; resolves to a map.
    Nested(Vec<NamedSpec>),

    /// Conditional group: the control declaration resolves first, then only
    /// the arm whose guard equals the control value contributes its
    /// dependents. Unused arms are omitted from the result, not defaulted.
    Conditional {
        /// Controlling declaration.
        control: Box<NamedSpec>,
        /// (guard value, dependent declarations) arms.
        arms: Vec<(ParamValue, Vec<NamedSpec>)>,
    },
}

impl ParamSpec {
    /// Shorthand for an inclusive integer range.
    pub fn int_range(low: i64, high: i64) -> Self {
        ParamSpec::IntRange { low, high }
    }

    /// Shorthand for a float range.
    pub fn float_range(low: f64, high: f64) -> Self {
        ParamSpec::FloatRange { low, high }
    }

    /// Shorthand for a uniform choice.
    pub fn choice(options: Vec<ParamValue>) -> Self {
        ParamSpec::Choice {
            options,
            weights: None,
        }
    }

    /// Shorthand for a fixed value.
    pub fn fixed(value: impl Into<ParamValue>) -> Self {
        ParamSpec::Fixed(value.into())
    }

    /// Validates the declaration. Called once at pipeline-build time.
    ///
    /// # Errors
    ///
    /// - [`SpecError::InvertedBounds`] if a range has `low > high`
    /// - [`SpecError::NonFiniteBound`] if a float bound is NaN or infinite
    /// - [`SpecError::BadWeights`] if weights mismatch options, are
    ///   negative, or sum to zero
    pub fn validate(&self, name: &str) -> Result<(), SpecError> {
        match self {
            ParamSpec::Fixed(_) => Ok(()),
            ParamSpec::IntRange { low, high } => {
                if low > high {
                    return Err(SpecError::InvertedBounds {
                        name: name.to_string(),
                        low: *low as f64,
                        high: *high as f64,
                    });
                }
                Ok(())
            }
            ParamSpec::FloatRange { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(SpecError::NonFiniteBound {
                        name: name.to_string(),
                    });
                }
                if low > high {
                    return Err(SpecError::InvertedBounds {
                        name: name.to_string(),
                        low: *low,
                        high: *high,
                    });
                }
                Ok(())
            }
            ParamSpec::Choice { options, weights } => {
                if let Some(w) = weights {
                    if w.len() != options.len() {
                        return Err(SpecError::BadWeights {
                            name: name.to_string(),
                            reason: format!("{} weights for {} options", w.len(), options.len()),
                        });
                    }
                    if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(SpecError::BadWeights {
                            name: name.to_string(),
                            reason: "weights must be finite and non-negative".into(),
                        });
                    }
                    if w.iter().sum::<f64>() <= 0.0 {
                        return Err(SpecError::BadWeights {
                            name: name.to_string(),
                            reason: "weights sum to zero".into(),
                        });
                    }
                }
                Ok(())
            }
            ParamSpec::PerAxis { x, y } => {
                x.validate(&format!("{name}.x"))?;
                y.validate(&format!("{name}.y"))
            }
            ParamSpec::Nested(fields) => {
                for field in fields {
                    field.spec.validate(&format!("{name}.{}", field.name))?;
                }
                Ok(())
            }
            ParamSpec::Conditional { control, arms } => {
                control.spec.validate(&format!("{name}.{}", control.name))?;
                for (_, deps) in arms {
                    for dep in deps {
                        dep.spec.validate(&format!("{name}.{}", dep.name))?;
                    }
                }
                Ok(())
            }
        }
    }
}
