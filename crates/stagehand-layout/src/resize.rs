#![forbid(unsafe_code)]

//! Edge and corner resize grips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Rect, Size};
use stagehand_core::scale::CoordinateSpace;

/// Default distance from a pane edge, in unscaled pixels, that still counts
/// as grabbing that edge.
pub const RESIZER_DEFAULT_THRESHOLD: f64 = 25.0;

/// Resize grip classification for any-edge / any-corner interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeGrip {
    Top,
    Right,
    Bottom,
    Left,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl ResizeGrip {
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::TopRight,
        Self::TopLeft,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// `Some(true)` for the right edge, `Some(false)` for the left edge.
    #[must_use]
    pub const fn horizontal_edge(self) -> Option<bool> {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Some(false),
            Self::Right | Self::TopRight | Self::BottomRight => Some(true),
            Self::Top | Self::Bottom => None,
        }
    }

    /// `Some(true)` for the bottom edge, `Some(false)` for the top edge.
    #[must_use]
    pub const fn vertical_edge(self) -> Option<bool> {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Some(false),
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Some(true),
            Self::Left | Self::Right => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for ResizeGrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeGrip {
    type Err = ParseGripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ParseGripError(s.to_string()))
    }
}

/// Unknown resize grip name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGripError(pub String);

impl fmt::Display for ParseGripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resize grip {:?}", self.0)
    }
}

impl std::error::Error for ParseGripError {}

/// Classify which grip `pointer` is on for a pane occupying `rect`.
///
/// `inset` is the grab distance in stage pixels on either side of each edge.
#[must_use]
pub fn classify_resize_grip(rect: Rect, pointer: Point, inset: f64) -> Option<ResizeGrip> {
    let inset = inset.max(0.5);
    let left = rect.x;
    let right = rect.right();
    let top = rect.y;
    let bottom = rect.bottom();
    let (px, py) = (pointer.x, pointer.y);

    if px < left - inset || px > right + inset || py < top - inset || py > bottom + inset {
        return None;
    }

    let near_left = (px - left).abs() <= inset;
    let near_right = (px - right).abs() <= inset;
    let near_top = (py - top).abs() <= inset;
    let near_bottom = (py - bottom).abs() <= inset;

    match (near_left, near_right, near_top, near_bottom) {
        (true, false, true, false) => Some(ResizeGrip::TopLeft),
        (false, true, true, false) => Some(ResizeGrip::TopRight),
        (true, false, false, true) => Some(ResizeGrip::BottomLeft),
        (false, true, false, true) => Some(ResizeGrip::BottomRight),
        (true, false, false, false) => Some(ResizeGrip::Left),
        (false, true, false, false) => Some(ResizeGrip::Right),
        (false, false, true, false) => Some(ResizeGrip::Top),
        (false, false, false, true) => Some(ResizeGrip::Bottom),
        _ => None,
    }
}

/// Bounds at the start of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOrigin {
    pub position: Point,
    pub size: Size,
}

/// Compute new bounds for a grip dragged by `delta` stage pixels since the
/// gesture began.
///
/// The size is clamped to `[min, max]`. Grips on the top or left edge also
/// shift the position so the opposite edge stays where it was.
#[must_use]
pub fn resize_bounds(
    space: &dyn CoordinateSpace,
    grip: ResizeGrip,
    origin: ResizeOrigin,
    delta: Point,
    min: Size,
    max: Option<Size>,
) -> (Point, Size) {
    let dx = space.revert_scale_x(delta.x);
    let dy = space.revert_scale_y(delta.y);
    let width = match grip.horizontal_edge() {
        Some(true) => origin.size.width + dx,
        Some(false) => origin.size.width - dx,
        None => origin.size.width,
    };
    let height = match grip.vertical_edge() {
        Some(true) => origin.size.height + dy,
        Some(false) => origin.size.height - dy,
        None => origin.size.height,
    };
    let size = Size::new(width, height).clamp(min, max);

    let mut position = origin.position;
    if grip.horizontal_edge() == Some(false) {
        position.x += space.scale_x(origin.size.width - size.width);
    }
    if grip.vertical_edge() == Some(false) {
        position.y += space.scale_y(origin.size.height - size.height);
    }
    (position, size)
}
