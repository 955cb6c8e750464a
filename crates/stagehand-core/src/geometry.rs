#![forbid(unsafe_code)]

//! Geometric primitives for stage-local pixel space.
//!
//! All values are `f64` pixels with the origin at the stage's top-left corner.
//! Positions live in stage (scaled) space and sizes in pane (unscaled) space;
//! see [`crate::scale::CoordinateSpace`] for the conversions between the two.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A point or displacement in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Add the same offset to both axes.
    #[inline]
    #[must_use]
    pub fn offset(self, by: f64) -> Self {
        Self::new(self.x + by, self.y + by)
    }

    /// Clamp both coordinates to be non-negative.
    #[inline]
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.x.max(0.0), self.y.max(0.0))
    }

    /// Euclidean length when the point is read as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp each axis into `[min, max]`. `max` of `None` means unbounded.
    ///
    /// When `max` is smaller than `min` on an axis, `min` wins.
    #[must_use]
    pub fn clamp(self, min: Size, max: Option<Size>) -> Self {
        let (mut width, mut height) = (self.width, self.height);
        if let Some(max) = max {
            width = width.min(max.width);
            height = height.min(max.height);
        }
        Self::new(width.max(min.width), height.max(min.height))
    }

    /// Both dimensions are finite and strictly positive.
    #[inline]
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Each axis of `self` is at least the matching axis of `other`.
    #[inline]
    #[must_use]
    pub fn contains_size(self, other: Size) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero or negative area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Compute the intersection with another rectangle, if any.
    #[must_use]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Split off a strip of at most `height` pixels from the top.
    ///
    /// Returns `(top, rest)`; `rest` is empty when the strip covers everything.
    #[must_use]
    pub fn split_top(&self, height: f64) -> (Rect, Rect) {
        let strip = height.clamp(0.0, self.height.max(0.0));
        (
            Rect::new(self.x, self.y, self.width, strip),
            Rect::new(self.x, self.y + strip, self.width, self.height - strip),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a + b, Point::new(13.0, 24.0));
        assert_eq!(a - b, Point::new(7.0, 16.0));
        assert_eq!(-b, Point::new(-3.0, -4.0));
        assert_eq!(b.length(), 5.0);
        assert_eq!(Point::new(-5.0, 3.0).non_negative(), Point::new(0.0, 3.0));
        assert_eq!(a.offset(20.0), Point::new(30.0, 40.0));
    }

    #[test]
    fn size_clamp_respects_min_and_max() {
        let min = Size::new(100.0, 100.0);
        let max = Some(Size::new(300.0, 200.0));
        assert_eq!(Size::new(50.0, 500.0).clamp(min, max), Size::new(100.0, 200.0));
        assert_eq!(Size::new(150.0, 150.0).clamp(min, max), Size::new(150.0, 150.0));
        assert_eq!(Size::new(5_000.0, 5.0).clamp(min, None), Size::new(5_000.0, 100.0));
    }

    #[test]
    fn size_clamp_prefers_min_when_bounds_cross() {
        let clamped = Size::new(80.0, 80.0).clamp(Size::new(100.0, 100.0), Some(Size::new(50.0, 50.0)));
        assert_eq!(clamped, Size::new(100.0, 100.0));
    }

    #[test]
    fn rect_edges_and_containment() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(!r.contains(Point::new(110.0, 20.0)));
        assert!(!Rect::new(0.0, 0.0, 0.0, 5.0).contains(Point::ZERO));
    }

    #[test]
    fn rect_intersection_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(a.intersection_opt(&Rect::new(20.0, 0.0, 1.0, 1.0)), None);
    }

    #[test]
    fn split_top_caps_strip() {
        let r = Rect::new(0.0, 0.0, 20.0, 30.0);
        let (top, rest) = r.split_top(10.0);
        assert_eq!(top, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(rest, Rect::new(0.0, 10.0, 20.0, 20.0));
        let (top, rest) = r.split_top(100.0);
        assert_eq!(top.height, 30.0);
        assert!(rest.is_empty());
    }

    #[test]
    fn serde_shape_is_flat() {
        let json = serde_json::to_string(&Point::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0}"#);
        let size: Size = serde_json::from_str(r#"{"width":3.0,"height":4.0}"#).unwrap();
        assert_eq!(size, Size::new(3.0, 4.0));
    }
}
