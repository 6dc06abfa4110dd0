//! Image buffer types.
//!
//! [`Image`] is a dense row-major interleaved pixel buffer with a runtime
//! channel count. Channel count is data here, not a type parameter, because
//! augmentations like channel shuffle and grayscale conversion need to
//! inspect and rewrite it.
//!
//! # Memory layout
//!
//! Pixels are stored row-major, top-to-bottom, channels interleaved:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//! ```
//!
//! The buffer lives in an [`Arc<Vec<T>>`]: clones share data, and the first
//! mutation after a clone triggers copy-on-write. Transforms produce new
//! images rather than mutating their input, so sharing is the common case.
//!
//! # Usage
//!
//! ```
//! use aug_core::Image;
//!
//! let mut img: Image<f32> = Image::new(64, 64, 3);
//! img.set_pixel(10, 10, &[1.0, 0.5, 0.25]);
//! assert_eq!(img.pixel(10, 10), &[1.0, 0.5, 0.25]);
//! ```

use crate::{Error, PixelFormat, Result};
use std::sync::Arc;

/// Segmentation mask: an integer-labeled buffer with the same spatial
/// extent as its paired image.
///
/// Masks resample nearest-neighbor by default so label values survive
/// geometric transforms unchanged.
pub type Mask = Image<u8>;

/// Owned image buffer with a runtime channel count.
///
/// # Example
///
/// ```
/// use aug_core::Image;
///
/// let img: Image<u8> = Image::filled(32, 32, 3, &[255, 0, 0]);
/// assert_eq!(img.dimensions(), (32, 32));
/// assert_eq!(img.channels(), 3);
/// ```
#[derive(Clone)]
pub struct Image<T: PixelFormat> {
    /// Pixel data buffer (Arc for cheap cloning).
    data: Arc<Vec<T>>,
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// Channels per pixel.
    channels: u32,
}

impl<T: PixelFormat> Image<T> {
    /// Creates a new image filled with zeros.
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            data: Arc::new(vec![T::zero(); len]),
            width,
            height,
            channels,
        }
    }

    /// Creates an image from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` does not hold exactly
    /// `width * height * channels` elements or `channels` is zero.
    pub fn from_data(width: u32, height: u32, channels: u32, data: Vec<T>) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                channels,
                "channel count must be > 0",
            ));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                channels,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            channels,
        })
    }

    /// Creates an image filled with a specific pixel value.
    ///
    /// # Panics
    ///
    /// Panics if `pixel.len() != channels`.
    pub fn filled(width: u32, height: u32, channels: u32, pixel: &[T]) -> Self {
        assert_eq!(pixel.len(), channels as usize, "fill pixel channel count");
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * channels as usize);
        for _ in 0..count {
            data.extend_from_slice(pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
            channels,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the pixel data.
    ///
    /// If the data is shared (Arc refcount > 1), this clones it first to
    /// ensure exclusive access (copy-on-write).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Returns the element offset for pixel at (x, y).
    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Returns the pixel at (x, y) as a channel slice.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        &self.data[offset..offset + self.channels as usize]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[T]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds or `pixel.len() != channels`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[T]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        assert_eq!(pixel.len(), self.channels as usize);
        let offset = self.pixel_offset(x, y);
        let ch = self.channels as usize;
        let data = Arc::make_mut(&mut self.data);
        data[offset..offset + ch].copy_from_slice(pixel);
    }

    /// Fills the entire image with a pixel value.
    ///
    /// # Panics
    ///
    /// Panics if `pixel.len() != channels`.
    pub fn fill(&mut self, pixel: &[T]) {
        assert_eq!(pixel.len(), self.channels as usize);
        let data = Arc::make_mut(&mut self.data);
        for chunk in data.chunks_exact_mut(pixel.len()) {
            chunk.copy_from_slice(pixel);
        }
    }

    /// Returns a row of pixels as a slice.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        debug_assert!(y < self.height, "row out of bounds");
        let w = self.width as usize * self.channels as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, &[T])> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Applies a function to each pixel in place.
    ///
    /// The closure receives a mutable channel slice.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(&mut [T]),
    {
        let ch = self.channels as usize;
        let data = Arc::make_mut(&mut self.data);
        for chunk in data.chunks_exact_mut(ch) {
            f(chunk);
        }
    }

    /// Converts to a different pixel component format.
    ///
    /// Each channel value goes through [`PixelFormat::to_f32`] and
    /// [`PixelFormat::from_f32`], so integer formats normalize to [0, 1]
    /// when converting to float and clamp when converting back.
    ///
    /// # Example
    ///
    /// ```
    /// use aug_core::Image;
    ///
    /// let bytes: Image<u8> = Image::filled(4, 4, 3, &[255, 128, 0]);
    /// let floats: Image<f32> = bytes.convert_format();
    /// assert_eq!(floats.pixel(0, 0)[0], 1.0);
    /// ```
    pub fn convert_format<T2: PixelFormat>(&self) -> Image<T2> {
        let mut out = Image::<T2>::new(self.width, self.height, self.channels);
        {
            let dst = out.data_mut();
            for (d, s) in dst.iter_mut().zip(self.data.iter()) {
                *d = T2::from_f32(s.to_f32());
            }
        }
        out
    }
}

impl<T: PixelFormat> std::fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("format", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: PixelFormat + PartialEq> PartialEq for Image<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.channels == other.channels
            && self.data == other.data
    }
}
