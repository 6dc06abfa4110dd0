//! Keypoint targets.

/// A 2D keypoint with optional orientation and scale.
///
/// Spatial transforms move the (x, y) position as a coordinate, add their
/// rotation to `angle` when one is set, and multiply `scale` by their
/// scaling factor when one is set.
///
/// # Example
///
/// ```
/// use aug_core::Keypoint;
///
/// let kp = Keypoint::new(10.0, 20.0).with_angle(0.5).with_scale(2.0);
/// assert_eq!(kp.x, 10.0);
/// assert_eq!(kp.angle, Some(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Orientation in radians, if tracked.
    pub angle: Option<f64>,
    /// Scale factor, if tracked.
    pub scale: Option<f64>,
}

impl Keypoint {
    /// Creates a keypoint at (x, y) with no angle or scale.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            angle: None,
            scale: None,
        }
    }

    /// Attaches an orientation in radians.
    #[inline]
    pub const fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Attaches a scale factor.
    #[inline]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Moves the position through a point transform, leaving angle and
    /// scale untouched.
    pub fn map_position<F>(&self, f: F) -> Self
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let (x, y) = f(self.x, self.y);
        Self { x, y, ..*self }
    }

    /// Adds a rotation (radians) to the tracked angle, if any.
    pub fn rotated_by(&self, radians: f64) -> Self {
        Self {
            angle: self.angle.map(|a| a + radians),
            ..*self
        }
    }

    /// Multiplies the tracked scale, if any.
    pub fn scaled_by(&self, factor: f64) -> Self {
        Self {
            scale: self.scale.map(|s| s * factor),
            ..*self
        }
    }

    /// Converts from normalized [0, 1] coordinates to absolute pixels.
    pub fn to_absolute(&self, width: u32, height: u32) -> Self {
        Self {
            x: self.x * width as f64,
            y: self.y * height as f64,
            ..*self
        }
    }

    /// Converts from absolute pixels to normalized [0, 1] coordinates.
    pub fn to_normalized(&self, width: u32, height: u32) -> Self {
        Self {
            x: self.x / width as f64,
            y: self.y / height as f64,
            ..*self
        }
    }

    /// Returns `true` if the point lies inside an absolute-pixel canvas.
    #[inline]
    pub fn in_canvas(&self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.x < width as f64 && self.y >= 0.0 && self.y < height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_position_keeps_attributes() {
        let kp = Keypoint::new(1.0, 2.0).with_angle(0.3).with_scale(1.5);
        let moved = kp.map_position(|x, y| (y, x));
        assert_eq!(moved.x, 2.0);
        assert_eq!(moved.y, 1.0);
        assert_eq!(moved.angle, Some(0.3));
        assert_eq!(moved.scale, Some(1.5));
    }

    #[test]
    fn test_rotated_by_without_angle() {
        let kp = Keypoint::new(0.0, 0.0).rotated_by(1.0);
        assert_eq!(kp.angle, None);
    }

    #[test]
    fn test_in_canvas() {
        assert!(Keypoint::new(0.0, 0.0).in_canvas(10, 10));
        assert!(!Keypoint::new(10.0, 0.0).in_canvas(10, 10));
        assert!(!Keypoint::new(-0.1, 5.0).in_canvas(10, 10));
    }
}
