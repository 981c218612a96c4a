#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! [`Viewport`] is the host-supplied drawing area in whole pixels.
//! [`Point`] and [`Rect`] are continuous screen-space values used by draw
//! primitives; origin is the top-left corner, `y` grows downward.

/// Host drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the viewport has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width as `f64`.
    #[inline]
    pub fn w(&self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    #[inline]
    pub fn h(&self) -> f64 {
        f64::from(self.height)
    }

    /// Center of the viewport.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }

    /// Length of the shorter side.
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.w().min(self.h())
    }

    /// The whole viewport as a [`Rect`].
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }
}

/// A screen-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Offset by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A screen-space axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// All fields are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_area_and_center() {
        let vp = Viewport::new(640, 480);
        assert_eq!(vp.area(), 307_200);
        assert_eq!(vp.center(), Point::new(320.0, 240.0));
        assert_eq!(vp.min_side(), 480.0);
        assert!(!vp.is_empty());
    }

    #[test]
    fn zero_viewport_is_empty() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(Viewport::new(10, 0).is_empty());
        assert!(Viewport::default().is_empty());
        assert_eq!(Viewport::default().area(), 0);
    }

    #[test]
    fn area_does_not_overflow_u32() {
        let vp = Viewport::new(u32::MAX, u32::MAX);
        assert_eq!(vp.area(), u32::MAX as u64 * u32::MAX as u64);
    }

    #[test]
    fn rect_edges_and_contains() {
        let r = Rect::new(10.0, 20.0, 5.0, 4.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 24.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(!r.contains(Point::new(15.0, 20.0)));
        assert_eq!(r.center(), Point::new(12.5, 22.0));
    }

    #[test]
    fn degenerate_rects_are_empty() {
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, -1.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f64::NAN, 5.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, f64::NAN, 5.0).is_finite());
    }
}
