#![forbid(unsafe_code)]

//! Raw pointer input as delivered by the embedding host.
//!
//! Coordinates are client (viewport) pixels. The [`crate::stage::Stage`]
//! converts them to stage-local pixels by subtracting its observed origin.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Which device produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "device")]
pub enum PointerSource {
    Mouse,
    /// A touch event together with the number of active touch points.
    Touch { touches: u8 },
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Primary button (or touch) pressed.
    Down,
    Move,
    /// Primary button (or touch) released.
    Up,
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub client: Point,
    pub source: PointerSource,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, client: Point, source: PointerSource) -> Self {
        Self {
            kind,
            client,
            source,
        }
    }

    /// Mouse button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, Point::new(x, y), PointerSource::Mouse)
    }

    /// Mouse move to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, Point::new(x, y), PointerSource::Mouse)
    }

    /// Mouse button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, Point::new(x, y), PointerSource::Mouse)
    }

    /// Single-finger touch variant of this event.
    #[must_use]
    pub const fn with_touches(mut self, touches: u8) -> Self {
        self.source = PointerSource::Touch { touches };
        self
    }

    /// Whether the stage should track this event.
    ///
    /// Multi-touch moves are gestures the stage does not track; touch
    /// presses and releases always count.
    #[must_use]
    pub const fn is_trackable(&self) -> bool {
        match (self.kind, self.source) {
            (PointerEventKind::Move, PointerSource::Touch { touches }) => touches == 1,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_touch_is_not_trackable() {
        assert!(PointerEvent::moved(1.0, 1.0).is_trackable());
        assert!(PointerEvent::moved(1.0, 1.0).with_touches(1).is_trackable());
        assert!(!PointerEvent::moved(1.0, 1.0).with_touches(2).is_trackable());
        assert!(!PointerEvent::moved(1.0, 1.0).with_touches(0).is_trackable());
        assert!(PointerEvent::up(1.0, 1.0).with_touches(0).is_trackable());
    }

    #[test]
    fn serializes_with_tagged_source() {
        let json = serde_json::to_value(PointerEvent::down(3.0, 4.0).with_touches(1)).unwrap();
        assert_eq!(json["kind"], "down");
        assert_eq!(json["source"]["device"], "touch");
        assert_eq!(json["source"]["touches"], 1);
    }
}
