//! Resolution of declarations into concrete values.
//!
//! The sampler takes an explicit random-source handle; it never touches
//! process-wide state. Every declaration resolves to exactly one value per
//! call, and conditional groups resolve their control first so unused arms
//! never consume randomness for values that will not appear.

use crate::error::SampleError;
use crate::params::SampledParams;
use crate::spec::{NamedSpec, ParamSpec};
use crate::value::ParamValue;
use rand::Rng;
use std::collections::BTreeMap;

/// Resolves a full declaration set into one [`SampledParams`].
///
/// Conditional declarations may contribute several entries (the control
/// plus the matching arm's dependents); everything else contributes one
/// entry under its own name.
///
/// # Example
///
/// ```
/// use aug_sample::{NamedSpec, ParamSpec, sample_specs};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let specs = vec![NamedSpec::new("k", ParamSpec::int_range(1, 5))];
/// let mut rng = StdRng::seed_from_u64(7);
/// let params = sample_specs(&specs, &mut rng).unwrap();
/// assert!((1..=5).contains(&params.i64("k").unwrap()));
/// ```
pub fn sample_specs<R: Rng>(
    specs: &[NamedSpec],
    rng: &mut R,
) -> Result<SampledParams, SampleError> {
    let mut out: Vec<(String, ParamValue)> = Vec::with_capacity(specs.len());
    for named in specs {
        match &named.spec {
            // Conditional results flatten into the top-level set so the
            // consumer sees `mode` and `fill` side by side.
            ParamSpec::Conditional { control, arms } => {
                let control_value = resolve(&control.name, &control.spec, rng)?;
                for (guard, deps) in arms {
                    if *guard == control_value {
                        for dep in deps {
                            let v = resolve(&dep.name, &dep.spec, rng)?;
                            out.push((dep.name.clone(), v));
                        }
                        break;
                    }
                }
                out.push((control.name.clone(), control_value));
            }
            spec => {
                let v = resolve(&named.name, spec, rng)?;
                out.push((named.name.clone(), v));
            }
        }
    }
    Ok(out.into_iter().collect())
}

/// Resolves a single declaration into one concrete value.
pub fn resolve<R: Rng>(
    name: &str,
    spec: &ParamSpec,
    rng: &mut R,
) -> Result<ParamValue, SampleError> {
    match spec {
        ParamSpec::Fixed(v) => Ok(v.clone()),

        ParamSpec::IntRange { low, high } => {
            // Inclusive of both ends; a degenerate range is the bound.
            if low == high {
                Ok(ParamValue::Int(*low))
            } else {
                Ok(ParamValue::Int(rng.gen_range(*low..=*high)))
            }
        }

        ParamSpec::FloatRange { low, high } => {
            if low == high {
                Ok(ParamValue::Float(*low))
            } else {
                Ok(ParamValue::Float(rng.gen_range(*low..*high)))
            }
        }

        ParamSpec::Choice { options, weights } => {
            if options.is_empty() {
                return Err(SampleError::EmptyChoice {
                    name: name.to_string(),
                });
            }
            let idx = match weights {
                None => rng.gen_range(0..options.len()),
                Some(w) => weighted_index(w, rng),
            };
            Ok(options[idx].clone())
        }

        ParamSpec::PerAxis { x, y } => {
            let vx = resolve(&format!("{name}.x"), x, rng)?;
            let vy = resolve(&format!("{name}.y"), y, rng)?;
            let map = BTreeMap::from([("x".to_string(), vx), ("y".to_string(), vy)]);
            Ok(ParamValue::Map(map))
        }

        ParamSpec::Nested(fields) => {
            let mut map = BTreeMap::new();
            for field in fields {
                let v = resolve(&format!("{name}.{}", field.name), &field.spec, rng)?;
                map.insert(field.name.clone(), v);
            }
            Ok(ParamValue::Map(map))
        }

        ParamSpec::Conditional { control, arms } => {
            // Standalone resolution keeps the group together as a map.
            let control_value = resolve(&control.name, &control.spec, rng)?;
            let mut map = BTreeMap::new();
            for (guard, deps) in arms {
                if *guard == control_value {
                    for dep in deps {
                        let v = resolve(&format!("{name}.{}", dep.name), &dep.spec, rng)?;
                        map.insert(dep.name.clone(), v);
                    }
                    break;
                }
            }
            map.insert(control.name.clone(), control_value);
            Ok(ParamValue::Map(map))
        }
    }
}

/// Draws an index from a cumulative weight distribution.
///
/// Weights are validated at build time (non-negative, positive sum), so the
/// draw always lands on an option.
fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let draw = rng.gen_range(0.0..total);
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if draw < acc {
            return i;
        }
    }
    weights.len() - 1
}
