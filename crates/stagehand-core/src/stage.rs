#![forbid(unsafe_code)]

//! The stage: root coordinate frame and shared pointer state.
//!
//! A [`Stage`] owns the pixel size and scale every zone and pane works in,
//! tracks where it sits on screen, and republishes raw client pointer input
//! as stage-local observables.
//!
//! # Invariants
//!
//! - `pointer` is always `client - origin` of the latest trackable event.
//! - `wheel_busy` is never true while `lmb` is false.
//! - `origin` changes only through [`Stage::observe_rect`] and only when the
//!   observed rectangle moved.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::{Point, Rect, Size};
use crate::reactive::Observable;
use crate::scale::{CoordinateSpace, Scale};

/// Default stage size in pixels.
pub const STAGE_DEFAULT_SIZE: Size = Size::new(800.0, 600.0);

/// Stage construction options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageOptions {
    pub size: Size,
    pub scale: Scale,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            size: STAGE_DEFAULT_SIZE,
            scale: Scale::IDENTITY,
        }
    }
}

/// Stage-local view of one accepted pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageInput {
    pub kind: PointerEventKind,
    /// Pointer in stage-local pixels.
    pub pointer: Point,
}

/// Root coordinate-space authority.
#[derive(Debug)]
pub struct Stage {
    size: Size,
    scale: Scale,
    origin: Point,
    observed: Option<Point>,
    pointer: Observable<Point>,
    lmb: Observable<bool>,
    wheel_busy: Observable<bool>,
}

impl Stage {
    #[must_use]
    pub fn new(options: StageOptions) -> Self {
        Self {
            size: options.size,
            scale: options.scale,
            origin: Point::ZERO,
            observed: None,
            pointer: Observable::new(Point::ZERO),
            lmb: Observable::new(false),
            wheel_busy: Observable::new(false),
        }
    }

    /// On-screen position of the stage's top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Record the stage's on-screen rectangle as reported by an intersection
    /// observer. Returns whether the origin changed.
    ///
    /// Observations made while the stage is off-screen are ignored, and so
    /// are repeated observations at an unchanged position.
    pub fn observe_rect(&mut self, rect: Rect, intersecting: bool) -> bool {
        if !intersecting {
            return false;
        }
        let origin = rect.origin();
        if self.observed == Some(origin) {
            return false;
        }
        self.observed = Some(origin);
        self.origin = origin;
        debug!(x = origin.x, y = origin.y, "stage origin updated");
        true
    }

    /// Change the stage size, returning the previous one.
    pub fn resize(&mut self, size: Size) -> Size {
        let previous = self.size;
        self.size = size;
        if previous != size {
            debug!(
                width = size.width,
                height = size.height,
                "stage resized"
            );
        }
        previous
    }

    /// Replace the scale factors.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Frozen copy of the current coordinate frame.
    #[must_use]
    pub fn frame(&self) -> crate::scale::StageFrame {
        crate::scale::StageFrame::new(self.size, self.scale)
    }

    /// Latest stage-local pointer position.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer.get()
    }

    /// Whether the primary button (or a touch) is held.
    #[must_use]
    pub fn lmb(&self) -> bool {
        self.lmb.get()
    }

    #[must_use]
    pub fn wheel_busy(&self) -> bool {
        self.wheel_busy.get()
    }

    /// Mark nested scrolling as captured. Ignored while the button is up.
    pub fn set_wheel_busy(&mut self, busy: bool) {
        self.wheel_busy.set(busy && self.lmb.get());
    }

    /// Observable pointer handle for subscribers.
    #[must_use]
    pub fn pointer_observable(&self) -> Observable<Point> {
        self.pointer.clone()
    }

    #[must_use]
    pub fn lmb_observable(&self) -> Observable<bool> {
        self.lmb.clone()
    }

    #[must_use]
    pub fn wheel_busy_observable(&self) -> Observable<bool> {
        self.wheel_busy.clone()
    }

    /// Feed one raw client-space pointer event.
    ///
    /// Returns the stage-local interpretation, or `None` when the event is a
    /// multi-touch gesture the stage does not track.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<StageInput> {
        if !event.is_trackable() {
            trace!(source = ?event.source, "ignoring untrackable pointer event");
            return None;
        }
        let pointer = event.client - self.origin;
        self.pointer.set(pointer);
        match event.kind {
            PointerEventKind::Down => {
                self.lmb.set(true);
            }
            PointerEventKind::Up => {
                self.lmb.set(false);
                self.wheel_busy.set(false);
            }
            PointerEventKind::Move => {}
        }
        Some(StageInput {
            kind: event.kind,
            pointer,
        })
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(StageOptions::default())
    }
}

impl CoordinateSpace for Stage {
    fn scale(&self) -> Scale {
        self.scale
    }

    fn size(&self) -> Size {
        self.size
    }
}
