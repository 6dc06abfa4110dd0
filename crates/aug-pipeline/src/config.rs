//! Declarative pipeline configuration.
//!
//! A pipeline is data: a composition mode, a coordinate convention, and an
//! ordered list of named transform entries. The YAML form round-trips, so a
//! pipeline built in code can be serialized, stored, and rebuilt.
//!
//! ```yaml
//! mode: sequential
//! coordinate_space: absolute
//! transforms:
//!   - name: rotate
//!     probability: 0.8
//!     params:
//!       limit: [-30, 30]
//!       border_mode: constant
//!   - name: resize
//!     params: {height: 64, width: 64}
//! ```

use crate::compose::{Compose, CompositionMode, Step};
use crate::error::ConfigError;
use crate::registry::build_transform;
use crate::targets::CoordinateSpace;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_probability() -> f64 {
    1.0
}

/// One transform entry in a pipeline config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformEntry {
    /// Registry identifier.
    pub name: String,
    /// Transform-specific parameter block; omitted means all defaults.
    #[serde(default)]
    pub params: serde_yaml::Value,
    /// Activation probability, default 1.
    #[serde(default = "default_probability")]
    pub probability: f64,
}

/// Serializable description of a whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Composition mode, default sequential.
    #[serde(default)]
    pub mode: CompositionMode,
    /// Coordinate convention for boxes and keypoints, default absolute.
    #[serde(default)]
    pub coordinate_space: CoordinateSpace,
    /// Ordered transform entries.
    pub transforms: Vec<TransformEntry>,
}

impl PipelineConfig {
    /// Parses a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Serializes the config to YAML text.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds an executable pipeline.
    ///
    /// Every transform constructs and validates here; a config that builds
    /// cannot fail later for configuration reasons.
    pub fn build(&self) -> Result<Compose, ConfigError> {
        let mut steps = Vec::with_capacity(self.transforms.len());
        for entry in &self.transforms {
            let transform = build_transform(&entry.name, &entry.params)?;
            steps.push(Step::new(transform).with_probability(entry.probability));
        }
        Ok(Compose::new(self.mode, steps)?.with_coordinate_space(self.coordinate_space))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
mode: sequential
transforms:
  - name: rotate
    probability: 0.5
    params:
      limit: [-30, 30]
  - name: resize
    params: {height: 64, width: 64}
  - name: gauss_noise
";

    #[test]
    fn test_parse_and_build() {
        let config = PipelineConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.transforms.len(), 3);
        assert_eq!(config.transforms[0].probability, 0.5);
        assert_eq!(config.transforms[2].probability, 1.0);
        assert!(config.transforms[2].params.is_null());
        let pipeline = config.build().unwrap();
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn test_unknown_transform_fails_build() {
        let config = PipelineConfig::from_yaml("transforms:\n  - name: emboss\n").unwrap();
        assert!(matches!(
            config.build(),
            Err(ConfigError::UnknownTransform { .. })
        ));
    }

    #[test]
    fn test_bad_probability_fails_build() {
        let config =
            PipelineConfig::from_yaml("transforms:\n  - name: no_op\n    probability: 2.0\n")
                .unwrap();
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        assert!(PipelineConfig::from_yaml("transforms: []\nshuffle: true\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PipelineConfig::from_yaml(SAMPLE).unwrap();
        let text = config.to_yaml().unwrap();
        let reparsed = PipelineConfig::from_yaml(&text).unwrap();
        assert_eq!(reparsed.transforms.len(), config.transforms.len());
        assert_eq!(reparsed.mode, config.mode);
        assert_eq!(reparsed.transforms[0].probability, 0.5);
        reparsed.build().unwrap();
    }
}
