#![forbid(unsafe_code)]

//! Per-axis scale factors and the coordinate-space capability.
//!
//! A stage renders its contents scaled by `(sx, sy)`. Pane sizes are stored
//! unscaled while positions and the pointer live in scaled stage pixels, so
//! every layer that compares the two goes through [`CoordinateSpace`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Per-axis scale factors. Both are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Scale {
    x: f64,
    y: f64,
}

impl Scale {
    /// Identity scale.
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    /// Create a scale, rejecting zero, negative and non-finite factors.
    pub fn new(x: f64, y: f64) -> Result<Self, ScaleError> {
        if !x.is_finite() || x <= 0.0 {
            return Err(ScaleError::NonPositive { axis: "x", value: x });
        }
        if !y.is_finite() || y <= 0.0 {
            return Err(ScaleError::NonPositive { axis: "y", value: y });
        }
        Ok(Self { x, y })
    }

    #[inline]
    #[must_use]
    pub const fn x(self) -> f64 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn y(self) -> f64 {
        self.y
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[f64; 2]> for Scale {
    type Error = ScaleError;

    fn try_from([x, y]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<Scale> for [f64; 2] {
    fn from(scale: Scale) -> Self {
        [scale.x, scale.y]
    }
}

/// Scale construction failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    NonPositive { axis: &'static str, value: f64 },
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { axis, value } => {
                write!(f, "scale factor {axis} must be finite and > 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// Narrow capability handed to zones and panes: the stage's size and the
/// transforms between pane pixels and scaled stage pixels.
pub trait CoordinateSpace {
    /// Current scale factors.
    fn scale(&self) -> Scale;

    /// Current stage size in stage pixels.
    fn size(&self) -> Size;

    #[inline]
    fn scale_x(&self, value: f64) -> f64 {
        value * self.scale().x()
    }

    #[inline]
    fn scale_y(&self, value: f64) -> f64 {
        value * self.scale().y()
    }

    #[inline]
    fn revert_scale_x(&self, value: f64) -> f64 {
        value / self.scale().x()
    }

    #[inline]
    fn revert_scale_y(&self, value: f64) -> f64 {
        value / self.scale().y()
    }

    /// Scale a pane size into stage pixels.
    fn scale_size(&self, size: Size) -> Size {
        Size::new(self.scale_x(size.width), self.scale_y(size.height))
    }

    /// Convert a stage-pixel delta back into pane pixels.
    fn revert_delta(&self, delta: Point) -> Point {
        Point::new(self.revert_scale_x(delta.x), self.revert_scale_y(delta.y))
    }
}

/// A frozen snapshot of a stage's coordinate frame.
///
/// Useful for tests and for computing layout outside of a live [`crate::stage::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageFrame {
    pub size: Size,
    pub scale: Scale,
}

impl StageFrame {
    #[must_use]
    pub const fn new(size: Size, scale: Scale) -> Self {
        Self { size, scale }
    }

    /// Frame at identity scale.
    #[must_use]
    pub const fn unscaled(size: Size) -> Self {
        Self::new(size, Scale::IDENTITY)
    }
}

impl CoordinateSpace for StageFrame {
    fn scale(&self) -> Scale {
        self.scale
    }

    fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bad_factors() {
        assert!(Scale::new(0.0, 1.0).is_err());
        assert!(Scale::new(1.0, -2.0).is_err());
        assert!(Scale::new(f64::NAN, 1.0).is_err());
        assert!(Scale::new(1.0, f64::INFINITY).is_err());
        let err = Scale::new(1.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "scale factor y must be finite and > 0 (got 0)");
    }

    #[test]
    fn transforms_use_matching_axis() {
        let frame = StageFrame::new(Size::new(800.0, 600.0), Scale::new(2.0, 0.5).unwrap());
        assert_eq!(frame.scale_x(10.0), 20.0);
        assert_eq!(frame.scale_y(10.0), 5.0);
        assert_eq!(frame.revert_scale_x(20.0), 10.0);
        assert_eq!(frame.revert_scale_y(5.0), 10.0);
        assert_eq!(frame.scale_size(Size::new(100.0, 100.0)), Size::new(200.0, 50.0));
        assert_eq!(frame.revert_delta(Point::new(4.0, 4.0)), Point::new(2.0, 8.0));
    }

    #[test]
    fn serde_uses_pair_and_validates() {
        let scale: Scale = serde_json::from_str("[1.5, 2.0]").unwrap();
        assert_eq!(scale, Scale::new(1.5, 2.0).unwrap());
        assert_eq!(serde_json::to_string(&scale).unwrap(), "[1.5,2.0]");
        assert!(serde_json::from_str::<Scale>("[0.0, 1.0]").is_err());
    }

    proptest! {
        #[test]
        fn revert_inverts_scale(sx in 0.1f64..8.0, sy in 0.1f64..8.0, v in -5_000.0f64..5_000.0) {
            let frame = StageFrame::new(Size::new(1.0, 1.0), Scale::new(sx, sy).unwrap());
            prop_assert!((frame.revert_scale_x(frame.scale_x(v)) - v).abs() < 1e-9);
            prop_assert!((frame.revert_scale_y(frame.scale_y(v)) - v).abs() < 1e-9);
        }
    }
}
