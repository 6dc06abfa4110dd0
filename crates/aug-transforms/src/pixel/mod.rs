//! Pixel-value transforms.
//!
//! These operate on pixel values only: spatial extent and every auxiliary
//! target are unaffected, so the mask/bbox/keypoint companions are the
//! default identity implementations.

mod blur;
mod color;
mod noise;

pub use blur::{Blur, BlurConfig};
pub use color::{
    ChannelShuffle, InvertImg, Posterize, PosterizeConfig, RandomBrightnessContrast,
    RandomBrightnessContrastConfig, RandomGamma, RandomGammaConfig, Solarize, SolarizeConfig,
    ToGray,
};
pub use noise::{GaussNoise, GaussNoiseConfig};
