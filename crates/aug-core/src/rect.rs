//! Rectangle type for crop and pad arithmetic.
//!
//! Coordinates use the standard image convention: origin (0, 0) at the
//! top-left corner, X increasing right, Y increasing down.

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// # Example
///
/// ```
/// use aug_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// assert!(rect.fits_in(128, 128));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X origin (left edge).
    pub x: u32,
    /// Y origin (top edge).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle from origin and size.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns `true` if the rectangle fits entirely within a canvas of
    /// the given size.
    #[inline]
    pub const fn fits_in(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}
