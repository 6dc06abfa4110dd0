//! Axis-aligned bounding boxes.
//!
//! Boxes carry `(x_min, y_min, x_max, y_max)` corners plus an optional class
//! label. Coordinates can live in absolute pixels or normalized [0, 1] space;
//! which one is active is a pipeline-level flag, and conversion happens at
//! the pipeline boundary so transforms always see absolute pixels.
//!
//! # Clip/drop policy
//!
//! After a spatial transform, a box partially outside the canvas is clipped
//! to the canvas boundary; a box fully outside (or with zero area after
//! clipping) is dropped. [`BoundingBox::clip_to_canvas`] implements this.

use crate::{Error, Result};

/// Axis-aligned bounding box with optional class label.
///
/// # Example
///
/// ```
/// use aug_core::BoundingBox;
///
/// let b = BoundingBox::new(0.0, 0.0, 16.0, 16.0).with_label(3);
/// assert_eq!(b.width(), 16.0);
/// assert_eq!(b.label, Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
    /// Optional class label.
    pub label: Option<u32>,
}

impl BoundingBox {
    /// Creates a box from corner coordinates, without a label.
    #[inline]
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: None,
        }
    }

    /// Attaches a class label.
    #[inline]
    pub const fn with_label(mut self, label: u32) -> Self {
        self.label = Some(label);
        self
    }

    /// Box width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Box height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Box area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Validates that corners are finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedGeometry`] if any coordinate is non-finite
    /// or a min exceeds its max.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.x_min, self.y_min, self.x_max, self.y_max];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(Error::malformed_geometry(format!(
                "non-finite bbox coordinate: {:?}",
                coords
            )));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(Error::malformed_geometry(format!(
                "inverted bbox corners: ({}, {}, {}, {})",
                self.x_min, self.y_min, self.x_max, self.y_max
            )));
        }
        Ok(())
    }

    /// Clips the box to an absolute-pixel canvas.
    ///
    /// Returns `None` if the box falls fully outside the canvas or has zero
    /// area after clipping (the drop half of the clip/drop policy).
    pub fn clip_to_canvas(&self, width: u32, height: u32) -> Option<Self> {
        let x_min = self.x_min.max(0.0);
        let y_min = self.y_min.max(0.0);
        let x_max = self.x_max.min(width as f64);
        let y_max = self.y_max.min(height as f64);
        if x_max - x_min <= 0.0 || y_max - y_min <= 0.0 {
            return None;
        }
        Some(Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: self.label,
        })
    }

    /// Maps all four corners through a point transform and returns the
    /// axis-aligned envelope of the results.
    ///
    /// This is how affine transforms move boxes: corners transform as
    /// coordinates, and the output is the tightest axis-aligned box around
    /// them (a rotated box stays axis-aligned, growing as needed).
    pub fn map_corners<F>(&self, f: F) -> Self
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let corners = [
            f(self.x_min, self.y_min),
            f(self.x_max, self.y_min),
            f(self.x_min, self.y_max),
            f(self.x_max, self.y_max),
        ];
        let mut x_min = f64::INFINITY;
        let mut y_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for (x, y) in corners {
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: self.label,
        }
    }

    /// Converts from normalized [0, 1] coordinates to absolute pixels.
    pub fn to_absolute(&self, width: u32, height: u32) -> Self {
        Self {
            x_min: self.x_min * width as f64,
            y_min: self.y_min * height as f64,
            x_max: self.x_max * width as f64,
            y_max: self.y_max * height as f64,
            label: self.label,
        }
    }

    /// Converts from absolute pixels to normalized [0, 1] coordinates.
    pub fn to_normalized(&self, width: u32, height: u32) -> Self {
        Self {
            x_min: self.x_min / width as f64,
            y_min: self.y_min / height as f64,
            x_max: self.x_max / width as f64,
            y_max: self.y_max / height as f64,
            label: self.label,
        }
    }
}
