//! The transform registry.
//!
//! Maps stable string identifiers to build functions. Registration is an
//! explicit static table: adding a transform means adding a row here, and
//! an unknown name is a build-time [`ConfigError`], never a silent skip.

use crate::error::ConfigError;
use aug_transforms::Transform;
use aug_transforms::pixel::{
    Blur, ChannelShuffle, GaussNoise, InvertImg, Posterize, RandomBrightnessContrast, RandomGamma,
    Solarize, ToGray,
};
use aug_transforms::spatial::{
    Affine, CenterCrop, HorizontalFlip, PadIfNeeded, RandomCrop, Resize, Rotate, VerticalFlip,
};
use aug_transforms::NoOp;
use serde::de::DeserializeOwned;

type BuildFn = fn(&str, &serde_yaml::Value) -> Result<Box<dyn Transform>, ConfigError>;

/// Deserializes a transform's parameter block into its config shape.
///
/// A null/absent block reads as an empty mapping so transforms with full
/// defaults need no `params:` key at all.
fn parse_config<C: DeserializeOwned>(
    name: &str,
    params: &serde_yaml::Value,
) -> Result<C, ConfigError> {
    let value = if params.is_null() {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    } else {
        params.clone()
    };
    serde_yaml::from_value(value).map_err(|source| ConfigError::BadParams {
        name: name.to_string(),
        source,
    })
}

static REGISTRY: &[(&str, BuildFn)] = &[
    ("affine", |n, p| {
        Ok(Box::new(Affine::new(parse_config(n, p)?)?))
    }),
    ("blur", |n, p| Ok(Box::new(Blur::new(parse_config(n, p)?)?))),
    ("center_crop", |n, p| {
        Ok(Box::new(CenterCrop::new(parse_config(n, p)?)?))
    }),
    ("channel_shuffle", |_, _| {
        Ok(Box::new(ChannelShuffle::new()))
    }),
    ("gauss_noise", |n, p| {
        Ok(Box::new(GaussNoise::new(parse_config(n, p)?)?))
    }),
    ("horizontal_flip", |_, _| Ok(Box::new(HorizontalFlip::new()))),
    ("invert_img", |_, _| Ok(Box::new(InvertImg::new()))),
    ("no_op", |_, _| Ok(Box::new(NoOp::new()))),
    ("pad_if_needed", |n, p| {
        Ok(Box::new(PadIfNeeded::new(parse_config(n, p)?)?))
    }),
    ("posterize", |n, p| {
        Ok(Box::new(Posterize::new(parse_config(n, p)?)?))
    }),
    ("random_brightness_contrast", |n, p| {
        Ok(Box::new(RandomBrightnessContrast::new(parse_config(n, p)?)?))
    }),
    ("random_crop", |n, p| {
        Ok(Box::new(RandomCrop::new(parse_config(n, p)?)?))
    }),
    ("random_gamma", |n, p| {
        Ok(Box::new(RandomGamma::new(parse_config(n, p)?)?))
    }),
    ("resize", |n, p| {
        Ok(Box::new(Resize::new(parse_config(n, p)?)?))
    }),
    ("rotate", |n, p| {
        Ok(Box::new(Rotate::new(parse_config(n, p)?)?))
    }),
    ("solarize", |n, p| {
        Ok(Box::new(Solarize::new(parse_config(n, p)?)?))
    }),
    ("to_gray", |_, _| Ok(Box::new(ToGray::new()))),
    ("vertical_flip", |_, _| Ok(Box::new(VerticalFlip::new()))),
];

/// Builds a transform by registry name from a YAML parameter block.
///
/// # Errors
///
/// [`ConfigError::UnknownTransform`] for an unregistered name,
/// [`ConfigError::BadParams`] for a parameter block that does not match the
/// transform's config shape, or the transform's own validation error.
pub fn build_transform(
    name: &str,
    params: &serde_yaml::Value,
) -> Result<Box<dyn Transform>, ConfigError> {
    match REGISTRY.iter().find(|(id, _)| *id == name) {
        Some((_, build)) => build(name, params),
        None => Err(ConfigError::UnknownTransform {
            name: name.to_string(),
        }),
    }
}

/// All registered transform identifiers, sorted.
pub fn registered_names() -> Vec<&'static str> {
    REGISTRY.iter().map(|(id, _)| *id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_every_registered_name_builds_with_defaults() {
        // Transforms whose configs have required fields get them inline.
        let required: &[(&str, &str)] = &[
            ("center_crop", "{height: 8, width: 8}"),
            ("random_crop", "{height: 8, width: 8}"),
            ("resize", "{height: 8, width: 8}"),
            ("pad_if_needed", "{min_height: 8, min_width: 8}"),
        ];
        for name in registered_names() {
            let params = match required.iter().find(|(id, _)| *id == name) {
                Some((_, p)) => yaml(p),
                None => serde_yaml::Value::Null,
            };
            let built = build_transform(name, &params).unwrap();
            assert_eq!(built.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_loud() {
        let err = build_transform("sharpen", &serde_yaml::Value::Null)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownTransform { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = build_transform("rotate", &yaml("{limit: [-10, 10], degrees: true}"));
        assert!(matches!(err, Err(ConfigError::BadParams { .. })));
    }

    #[test]
    fn test_config_validation_propagates() {
        // An inverted blur range parses but fails the transform's own check.
        let err = build_transform("blur", &yaml("{blur_limit: [9, 3]}"));
        assert!(matches!(err, Err(ConfigError::Spec(_))));
    }

    #[test]
    fn test_params_parse_into_config() {
        let t = build_transform("rotate", &yaml("{limit: [-120, 120], border_mode: constant}"))
            .unwrap();
        assert_eq!(t.name(), "rotate");
        assert_eq!(t.specs().len(), 1);
    }

    #[test]
    fn test_fill_accepts_scalar_and_per_channel() {
        let t = build_transform(
            "rotate",
            &yaml("{limit: [-10, 10], border_mode: constant, fill: 0.5}"),
        )
        .unwrap();
        assert_eq!(t.name(), "rotate");
        let t = build_transform(
            "pad_if_needed",
            &yaml("{min_height: 8, min_width: 8, border_mode: constant, fill: [0.48, 0.45, 0.41]}"),
        )
        .unwrap();
        assert_eq!(t.name(), "pad_if_needed");
    }

    #[test]
    fn test_mask_interpolation_parses() {
        let t = build_transform(
            "resize",
            &yaml("{height: 8, width: 8, mask_interpolation: bilinear}"),
        )
        .unwrap();
        assert_eq!(t.name(), "resize");
        let t = build_transform("affine", &yaml("{mask_interpolation: nearest}")).unwrap();
        assert_eq!(t.name(), "affine");
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let names = registered_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
