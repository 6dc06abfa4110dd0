//! Sampled parameter sets.

use crate::error::SampleError;
use crate::value::ParamValue;
use std::collections::BTreeMap;

/// Immutable mapping from parameter name to resolved value.
///
/// Produced once per transform invocation and shared across the image and
/// every auxiliary target, so a geometric decision is never resampled per
/// target. Lookups fail loudly: a missing name or a type mismatch is a
/// [`SampleError`], never a default.
///
/// # Example
///
/// ```
/// use aug_sample::{ParamValue, SampledParams};
///
/// let params = SampledParams::from_iter([
///     ("angle".to_string(), ParamValue::Float(30.0)),
/// ]);
/// assert_eq!(params.f64("angle").unwrap(), 30.0);
/// assert!(params.f64("missing").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampledParams {
    values: BTreeMap<String, ParamValue>,
}

impl SampledParams {
    /// Creates an empty parameter set (for transforms with nothing to
    /// sample).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of resolved parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was sampled.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if the parameter exists.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Raw lookup.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&ParamValue, SampleError> {
        self.values
            .get(name)
            .ok_or_else(|| SampleError::Missing(name.to_string()))
    }

    fn wrong_type(name: &str, expected: &'static str, got: &ParamValue) -> SampleError {
        SampleError::WrongType {
            name: name.to_string(),
            expected,
            got: got.kind(),
        }
    }

    /// Typed lookup: float (integers coerce).
    pub fn f64(&self, name: &str) -> Result<f64, SampleError> {
        let v = self.require(name)?;
        v.as_f64().ok_or_else(|| Self::wrong_type(name, "float", v))
    }

    /// Typed lookup: integer.
    pub fn i64(&self, name: &str) -> Result<i64, SampleError> {
        let v = self.require(name)?;
        v.as_i64().ok_or_else(|| Self::wrong_type(name, "int", v))
    }

    /// Typed lookup: boolean.
    pub fn bool(&self, name: &str) -> Result<bool, SampleError> {
        let v = self.require(name)?;
        v.as_bool().ok_or_else(|| Self::wrong_type(name, "bool", v))
    }

    /// Typed lookup: string.
    pub fn str(&self, name: &str) -> Result<&str, SampleError> {
        let v = self.require(name)?;
        v.as_str()
            .ok_or_else(|| Self::wrong_type(name, "string", v))
    }

    /// Typed lookup: nested map (per-axis and conditional results).
    pub fn map(&self, name: &str) -> Result<&BTreeMap<String, ParamValue>, SampleError> {
        let v = self.require(name)?;
        v.as_map().ok_or_else(|| Self::wrong_type(name, "map", v))
    }

    /// Looks up the `x`/`y` floats of a per-axis parameter.
    pub fn axis_f64(&self, name: &str) -> Result<(f64, f64), SampleError> {
        let m = self.map(name)?;
        let axis = |key: &str| -> Result<f64, SampleError> {
            let v = m
                .get(key)
                .ok_or_else(|| SampleError::Missing(format!("{name}.{key}")))?;
            v.as_f64()
                .ok_or_else(|| Self::wrong_type(&format!("{name}.{key}"), "float", v))
        };
        Ok((axis("x")?, axis("y")?))
    }

    /// Iterates over name/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, ParamValue)> for SampledParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SampledParams {
        SampledParams::from_iter([
            ("angle".to_string(), ParamValue::Float(45.0)),
            ("ksize".to_string(), ParamValue::Int(3)),
            ("mode".to_string(), ParamValue::Str("constant".into())),
        ])
    }

    #[test]
    fn test_typed_lookups() {
        let p = sample();
        assert_eq!(p.f64("angle").unwrap(), 45.0);
        assert_eq!(p.i64("ksize").unwrap(), 3);
        assert_eq!(p.str("mode").unwrap(), "constant");
        // Int coerces to f64.
        assert_eq!(p.f64("ksize").unwrap(), 3.0);
    }

    #[test]
    fn test_missing_is_loud() {
        let p = sample();
        assert!(matches!(p.f64("nope"), Err(SampleError::Missing(_))));
    }

    #[test]
    fn test_wrong_type_is_loud() {
        let p = sample();
        let err = p.i64("mode").unwrap_err();
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn test_axis_lookup() {
        let inner = BTreeMap::from([
            ("x".to_string(), ParamValue::Float(0.1)),
            ("y".to_string(), ParamValue::Float(-0.2)),
        ]);
        let p = SampledParams::from_iter([("shift".to_string(), ParamValue::Map(inner))]);
        assert_eq!(p.axis_f64("shift").unwrap(), (0.1, -0.2));
    }
}
