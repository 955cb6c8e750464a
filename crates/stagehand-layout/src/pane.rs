#![forbid(unsafe_code)]

//! Panes: movable, resizable, stageable rectangles.
//!
//! A [`Pane`] owns its geometry and a small gesture machine. Every geometry
//! change is reported to the hosting zone through the [`ZoneLink`] in a
//! [`PaneContext`]; observable effects are queued as [`PaneEvent`]s for the
//! embedder to drain.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──begin_move──▶ Moving ──release──▶ Idle
//!    │                     │ pointer.x < staging distance
//!    │                     ▼
//!    │                  Staging ──release──▶ Staged ──restore_from_tray──▶ Idle
//!    └──begin_resize──▶ Resizing ──release──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. Size always lies within `[min_size, max_size]`.
//! 2. Unless `allow_outside` is set, every position change keeps the pane
//!    inside the stage (right/bottom first, then clamped to non-negative).
//! 3. Staged panes never start a move or resize gesture.
//! 4. Zone events addressed to another pane or another zone are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Rect, Size};
use stagehand_core::scale::CoordinateSpace;
use tracing::{debug, trace};

use crate::dispatch::{ZoneEvent, ZoneEventKind};
use crate::id::PaneId;
use crate::registry::BoundsReport;
use crate::resize::{
    RESIZER_DEFAULT_THRESHOLD, ResizeGrip, ResizeOrigin, classify_resize_grip, resize_bounds,
};
use crate::snap::ToSnap;
use crate::zone::ZoneLink;

/// Default pane size.
pub const PANE_DEFAULT_SIZE: Size = Size::new(500.0, 400.0);

/// Default lower size bound.
pub const PANE_DEFAULT_MIN_SIZE: Size = Size::new(100.0, 100.0);

/// Default distance from the stage's left edge at which a dragged pane starts
/// staging.
pub const DEFAULT_STAGING_DISTANCE: f64 = 150.0;

/// Default title bar height.
pub const DEFAULT_TITLE_BAR_HEIGHT: f64 = 32.0;

/// Half-width of the band around each edge that grabs a resize handle.
pub const RESIZE_HANDLE_INSET: f64 = 6.0;

/// Extra z-index while the pane is dragged through a snap handle.
pub const SNAP_MOVING_Z_BONUS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Thumbnail sizing for staged panes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagedSize {
    /// Fit the longer side to this width.
    Width(f64),
    /// Fit the height; landscape panes fit the tray width instead.
    Height(f64),
    /// Fit whichever side is longer to the matching dimension.
    Both { width: f64, height: f64 },
}

impl Default for StagedSize {
    fn default() -> Self {
        Self::Both {
            width: 100.0,
            height: 120.0,
        }
    }
}

/// Computed staged thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagedLayout {
    /// Uniform factor applied to the pane.
    pub scale: f64,
    pub size: Size,
}

impl StagedSize {
    /// Uniform factor that shrinks `size` to the thumbnail.
    #[must_use]
    pub fn factor(self, size: Size, tray_width: f64) -> f64 {
        match self {
            Self::Width(w) if size.height > size.width => w / size.height,
            Self::Width(w) => w / size.width,
            Self::Height(_) if size.width > size.height => tray_width / size.width,
            Self::Height(h) => h / size.height,
            Self::Both { width, .. } if size.width > size.height => width / size.width,
            Self::Both { height, .. } => height / size.height,
        }
    }

    /// Thumbnail for a pane of `size` in a tray `tray_width` wide.
    #[must_use]
    pub fn layout(self, size: Size, tray_width: f64) -> StagedLayout {
        let scale = self.factor(size, tray_width);
        let mut thumb = Size::new(size.width * scale, size.height * scale);
        if matches!(self, Self::Height(_)) {
            thumb = Size::new(thumb.width * 0.8, thumb.height * 0.8);
        }
        StagedLayout { scale, size: thumb }
    }

    fn dimensions(self) -> [(&'static str, f64); 2] {
        match self {
            Self::Width(w) => [("staged_size.width", w), ("staged_size.width", w)],
            Self::Height(h) => [("staged_size.height", h), ("staged_size.height", h)],
            Self::Both { width, height } => {
                [("staged_size.width", width), ("staged_size.height", height)]
            }
        }
    }
}

/// Pane construction options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneOptions {
    /// Unscaled size.
    pub size: Size,
    /// Stage-pixel position.
    pub position: Point,
    pub min_size: Size,
    pub max_size: Option<Size>,
    pub resizable: bool,
    /// Inward band, in unscaled pixels, in which hovering reveals resizers.
    pub resizer_threshold: f64,
    pub title_bar_height: f64,
    pub staged: bool,
    pub staging_distance: f64,
    pub staged_size: StagedSize,
    /// Allow the pane to leave the stage.
    pub allow_outside: bool,
    /// Pull the pane back on-screen when the stage shrinks.
    pub compensate_on_viewport_resize: bool,
    pub always_on_top: bool,
}

impl Default for PaneOptions {
    fn default() -> Self {
        Self {
            size: PANE_DEFAULT_SIZE,
            position: Point::ZERO,
            min_size: PANE_DEFAULT_MIN_SIZE,
            max_size: None,
            resizable: true,
            resizer_threshold: RESIZER_DEFAULT_THRESHOLD,
            title_bar_height: DEFAULT_TITLE_BAR_HEIGHT,
            staged: false,
            staging_distance: DEFAULT_STAGING_DISTANCE,
            staged_size: StagedSize::default(),
            allow_outside: false,
            compensate_on_viewport_resize: true,
            always_on_top: false,
        }
    }
}

impl PaneOptions {
    /// Check sizes and thresholds.
    pub fn validate(&self) -> Result<(), PaneOptionsError> {
        let positive = [
            ("size.width", self.size.width),
            ("size.height", self.size.height),
            ("min_size.width", self.min_size.width),
            ("min_size.height", self.min_size.height),
            ("staging_distance", self.staging_distance),
        ];
        let max = self.max_size.map_or([("max_size.width", 1.0), ("max_size.height", 1.0)], |m| {
            [("max_size.width", m.width), ("max_size.height", m.height)]
        });
        for (field, value) in positive
            .into_iter()
            .chain(max)
            .chain(self.staged_size.dimensions())
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(PaneOptionsError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("resizer_threshold", self.resizer_threshold),
            ("title_bar_height", self.title_bar_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PaneOptionsError::Negative { field, value });
            }
        }
        if !self.position.is_finite() {
            return Err(PaneOptionsError::NonFinitePosition {
                position: self.position,
            });
        }
        if let Some(max) = self.max_size
            && (self.min_size.width > max.width || self.min_size.height > max.height)
        {
            return Err(PaneOptionsError::MinExceedsMax {
                min: self.min_size,
                max,
            });
        }
        Ok(())
    }
}

/// Invalid [`PaneOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneOptionsError {
    NonPositive { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    NonFinitePosition { position: Point },
    MinExceedsMax { min: Size, max: Size },
}

impl fmt::Display for PaneOptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "pane option {field} must be finite and > 0 (got {value})")
            }
            Self::Negative { field, value } => {
                write!(f, "pane option {field} must be finite and >= 0 (got {value})")
            }
            Self::NonFinitePosition { position } => {
                write!(f, "pane position must be finite (got {}, {})", position.x, position.y)
            }
            Self::MinExceedsMax { min, max } => write!(
                f,
                "min_size {}x{} exceeds max_size {}x{}",
                min.width, min.height, max.width, max.height
            ),
        }
    }
}

impl std::error::Error for PaneOptionsError {}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// How a staged pane got into the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagedBy {
    /// Stage button or option; no position to restore.
    Instant,
    /// Dragged into the staging area.
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "dock")]
pub enum PaneDock {
    #[default]
    Docked,
    Staged { by: StagedBy },
}

/// Where the embedder should draw the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    Canvas,
    Tray,
}

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaneGesture {
    #[default]
    Idle,
    Moving {
        /// Pointer offset from the pane origin at grab time.
        grab: Point,
        start: Point,
    },
    Resizing {
        grip: ResizeGrip,
        pointer: Point,
        origin: ResizeOrigin,
    },
}

/// Visual transform while a dragged pane hovers over the staging area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagingPreview {
    pub rotation_deg: f64,
    pub scale: f64,
    /// Transform origin relative to the pane.
    pub offset: Point,
}

/// What kind of change produced a geometry update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsChangeReason {
    /// Gesture-driven.
    User,
    /// Viewport compensation, snapping or tray restore.
    System,
}

/// Observable pane effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum PaneEvent {
    PositionChanged {
        position: Point,
        reason: BoundsChangeReason,
    },
    SizeChanged {
        size: Size,
        reason: BoundsChangeReason,
    },
    StagedChanged {
        staged: bool,
    },
    MoveStarted,
    MoveEnded,
    Focused,
    Blurred,
}

/// Part of the pane under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneHit {
    Resize(ResizeGrip),
    TitleBar,
    Content,
}

/// Capabilities a pane needs from its surroundings for one call.
pub struct PaneContext<'a> {
    pub space: &'a dyn CoordinateSpace,
    pub zone: &'a mut dyn ZoneLink,
}

impl<'a> PaneContext<'a> {
    pub fn new(space: &'a dyn CoordinateSpace, zone: &'a mut dyn ZoneLink) -> Self {
        Self { space, zone }
    }
}

// ---------------------------------------------------------------------------
// Pane
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    options: PaneOptions,
    position: Point,
    size: Size,
    dock: PaneDock,
    gesture: PaneGesture,
    staging: Option<StagingPreview>,
    restore_position: Point,
    snap_moving: bool,
    z_index: u64,
    focused: bool,
    show_resizers: bool,
    mounted: bool,
    events: Vec<PaneEvent>,
}

impl Pane {
    /// Create an unmounted pane.
    pub fn new(id: PaneId, options: PaneOptions) -> Result<Self, PaneOptionsError> {
        options.validate()?;
        let dock = if options.staged {
            PaneDock::Staged {
                by: StagedBy::Instant,
            }
        } else {
            PaneDock::Docked
        };
        Ok(Self {
            id,
            options,
            position: options.position,
            size: options.size.clamp(options.min_size, options.max_size),
            dock,
            gesture: PaneGesture::Idle,
            staging: None,
            restore_position: options.position,
            snap_moving: false,
            z_index: 0,
            focused: false,
            show_resizers: false,
            mounted: false,
            events: Vec::new(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> PaneId {
        self.id
    }

    #[must_use]
    pub const fn options(&self) -> &PaneOptions {
        &self.options
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Bounds in stage pixels.
    #[must_use]
    pub fn rect(&self, space: &dyn CoordinateSpace) -> Rect {
        Rect::from_parts(self.position, space.scale_size(self.size))
    }

    #[must_use]
    pub const fn dock(&self) -> PaneDock {
        self.dock
    }

    #[must_use]
    pub const fn gesture(&self) -> PaneGesture {
        self.gesture
    }

    #[must_use]
    pub const fn is_staged(&self) -> bool {
        matches!(self.dock, PaneDock::Staged { .. })
    }

    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.gesture, PaneGesture::Moving { .. })
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        matches!(self.gesture, PaneGesture::Resizing { .. })
    }

    /// Dragged over the staging area; releasing now stages the pane.
    #[must_use]
    pub const fn is_staging(&self) -> bool {
        self.staging.is_some()
    }

    #[must_use]
    pub const fn staging_preview(&self) -> Option<StagingPreview> {
        self.staging
    }

    #[must_use]
    pub const fn is_snap_moving(&self) -> bool {
        self.snap_moving
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub const fn show_resizers(&self) -> bool {
        self.show_resizers
    }

    #[must_use]
    pub const fn z_index(&self) -> u64 {
        self.z_index
    }

    /// Z-index to render with, including the snap-drag bonus.
    #[must_use]
    pub const fn effective_z_index(&self) -> u64 {
        if self.snap_moving {
            self.z_index + SNAP_MOVING_Z_BONUS
        } else {
            self.z_index
        }
    }

    #[must_use]
    pub const fn render_target(&self) -> RenderTarget {
        if self.is_staged() {
            RenderTarget::Tray
        } else {
            RenderTarget::Canvas
        }
    }

    /// Thumbnail geometry for the tray.
    #[must_use]
    pub fn staged_layout(&self, tray_width: f64) -> StagedLayout {
        self.options.staged_size.layout(self.size, tray_width)
    }

    /// Take queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<PaneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current report as the zone sees it.
    #[must_use]
    pub fn bounds_report(&self) -> BoundsReport {
        BoundsReport::new(self.position, self.size)
            .moving(self.is_moving())
            .resizing(self.is_resizing())
            .staged(self.is_staged())
            .width_limits(
                self.options.min_size.width,
                self.options.max_size.map(|max| max.width),
            )
    }

    // -----------------------------------------------------------------------
    // Geometry helpers
    // -----------------------------------------------------------------------

    fn contain(&self, space: &dyn CoordinateSpace, position: Point) -> Point {
        let stage = space.size();
        let scaled = space.scale_size(self.size);
        let mut p = position;
        if p.x + scaled.width > stage.width {
            p.x = stage.width - scaled.width;
        }
        if p.y + scaled.height > stage.height {
            p.y = stage.height - scaled.height;
        }
        p.non_negative()
    }

    fn set_position(
        &mut self,
        space: &dyn CoordinateSpace,
        position: Point,
        reason: BoundsChangeReason,
    ) -> bool {
        let position = if self.options.allow_outside {
            position
        } else {
            self.contain(space, position)
        };
        if position == self.position {
            return false;
        }
        self.position = position;
        self.events
            .push(PaneEvent::PositionChanged { position, reason });
        true
    }

    fn set_size(&mut self, size: Size, reason: BoundsChangeReason) -> bool {
        let size = size.clamp(self.options.min_size, self.options.max_size);
        if size == self.size {
            return false;
        }
        self.size = size;
        self.events.push(PaneEvent::SizeChanged { size, reason });
        true
    }

    fn report(&self, cx: &mut PaneContext<'_>) {
        cx.zone
            .on_window_bounds_changed(cx.space, self.id, self.bounds_report());
    }

    /// Report the end of a user gesture. Any resulting snap instruction is
    /// kept by the zone and delivered through [`Pane::apply_to_snap`].
    fn end(&self, cx: &mut PaneContext<'_>) {
        cx.zone
            .on_user_bounds_change_end(cx.space, self.id, self.bounds_report());
    }

    /// Report as a complete move gesture so the zone re-evaluates snapping.
    fn settle(&self, cx: &mut PaneContext<'_>) {
        cx.zone.on_window_bounds_changed(
            cx.space,
            self.id,
            self.bounds_report().moving(true),
        );
        self.end(cx);
    }

    fn preview(&self, cx: &PaneContext<'_>, pointer: Point) -> Option<StagingPreview> {
        let distance = pointer.x;
        let scaled = cx.space.scale_x(self.options.staging_distance);
        if distance >= scaled {
            return None;
        }
        Some(StagingPreview {
            rotation_deg: 90.0 * (1.0 - distance / scaled),
            scale: self
                .options
                .staged_size
                .factor(self.size, cx.zone.tray_width()),
            offset: pointer - self.position,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Attach to the zone: contain, focus and report initial bounds.
    pub fn mount(&mut self, cx: &mut PaneContext<'_>) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        let position = self.position;
        self.set_position(cx.space, position, BoundsChangeReason::System);
        self.focus(cx);
        if !self.is_staged() {
            cx.zone.note_window_position(self.position);
        }
        self.settle(cx);
        debug!(pane = %self.id, zone = %cx.zone.zone_id(), "pane mounted");
    }

    /// Detach from the zone. Records are purged at the zone's next flush.
    pub fn unmount(&mut self, zone: &mut dyn ZoneLink) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.gesture = PaneGesture::Idle;
        self.staging = None;
        zone.queue_unmount(self.id);
    }

    /// Raise to the top of the zone.
    pub fn focus(&mut self, cx: &mut PaneContext<'_>) {
        self.z_index = cx.zone.focus_window(self.id, self.options.always_on_top);
        if !self.focused {
            self.focused = true;
            self.events.push(PaneEvent::Focused);
        }
    }

    /// Follow the zone's focused window, emitting `Focused`/`Blurred`.
    pub fn sync_focus(&mut self, focused: Option<PaneId>) {
        let now = focused == Some(self.id);
        if now == self.focused {
            return;
        }
        self.focused = now;
        self.events.push(if now {
            PaneEvent::Focused
        } else {
            PaneEvent::Blurred
        });
    }

    pub fn set_always_on_top(&mut self, cx: &mut PaneContext<'_>, always_on_top: bool) {
        if self.options.always_on_top == always_on_top {
            return;
        }
        self.options.always_on_top = always_on_top;
        self.focus(cx);
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Start dragging by the title bar. Returns `false` if staged or busy.
    pub fn begin_move(&mut self, cx: &mut PaneContext<'_>, pointer: Point) -> bool {
        if self.is_staged() || self.gesture != PaneGesture::Idle {
            return false;
        }
        self.focus(cx);
        self.gesture = PaneGesture::Moving {
            grab: pointer - self.position,
            start: self.position,
        };
        self.events.push(PaneEvent::MoveStarted);
        self.report(cx);
        trace!(pane = %self.id, "move started");
        true
    }

    /// Start dragging a resize grip. Returns `false` if not resizable, staged
    /// or busy.
    pub fn begin_resize(
        &mut self,
        cx: &mut PaneContext<'_>,
        grip: ResizeGrip,
        pointer: Point,
    ) -> bool {
        if !self.options.resizable || self.is_staged() || self.gesture != PaneGesture::Idle {
            return false;
        }
        self.focus(cx);
        self.gesture = PaneGesture::Resizing {
            grip,
            pointer,
            origin: ResizeOrigin {
                position: self.position,
                size: self.size,
            },
        };
        self.report(cx);
        trace!(pane = %self.id, %grip, "resize started");
        true
    }

    /// Feed the shared pointer to the active gesture. Returns whether a
    /// gesture consumed it.
    pub fn pointer_moved(&mut self, cx: &mut PaneContext<'_>, pointer: Point) -> bool {
        match self.gesture {
            PaneGesture::Idle => false,
            PaneGesture::Moving { grab, .. } => {
                self.set_position(cx.space, pointer - grab, BoundsChangeReason::User);
                self.staging = self.preview(cx, pointer);
                if self.staging.is_none() {
                    cx.zone.note_window_position(self.position);
                }
                self.report(cx);
                true
            }
            PaneGesture::Resizing {
                grip,
                pointer: start,
                origin,
            } => {
                let (position, size) = resize_bounds(
                    cx.space,
                    grip,
                    origin,
                    pointer - start,
                    self.options.min_size,
                    self.options.max_size,
                );
                self.set_size(size, BoundsChangeReason::User);
                self.set_position(cx.space, position, BoundsChangeReason::User);
                self.report(cx);
                true
            }
        }
    }

    /// Button released. Ends the active gesture, staging the pane if it was
    /// dropped on the staging area.
    pub fn release(&mut self, cx: &mut PaneContext<'_>) -> bool {
        match std::mem::take(&mut self.gesture) {
            PaneGesture::Idle => false,
            PaneGesture::Moving { start, .. } => {
                self.events.push(PaneEvent::MoveEnded);
                if self.staging.take().is_some() {
                    self.restore_position = start;
                    self.dock = PaneDock::Staged { by: StagedBy::Move };
                    self.events.push(PaneEvent::StagedChanged { staged: true });
                    debug!(pane = %self.id, "staged by move");
                    self.settle(cx);
                } else {
                    self.end(cx);
                }
                true
            }
            PaneGesture::Resizing { .. } => {
                self.end(cx);
                true
            }
        }
    }

    /// Stage or unstage without restoring any position.
    pub fn set_staged(&mut self, cx: &mut PaneContext<'_>, staged: bool) -> bool {
        if staged == self.is_staged() {
            return false;
        }
        self.gesture = PaneGesture::Idle;
        self.staging = None;
        self.dock = if staged {
            PaneDock::Staged {
                by: StagedBy::Instant,
            }
        } else {
            PaneDock::Docked
        };
        self.events.push(PaneEvent::StagedChanged { staged });
        debug!(pane = %self.id, staged, "staged toggled");
        self.settle(cx);
        true
    }

    /// Bring a staged pane back to the canvas.
    pub fn restore_from_tray(&mut self, cx: &mut PaneContext<'_>) -> bool {
        let PaneDock::Staged { by } = self.dock else {
            return false;
        };
        self.dock = PaneDock::Docked;
        self.events.push(PaneEvent::StagedChanged { staged: false });
        if by == StagedBy::Move {
            let restore = self.restore_position;
            self.set_position(cx.space, restore, BoundsChangeReason::System);
        }
        self.settle(cx);
        self.focus(cx);
        debug!(pane = %self.id, ?by, "restored from tray");
        true
    }

    // -----------------------------------------------------------------------
    // Zone-driven updates
    // -----------------------------------------------------------------------

    /// Apply one synchronized snap-gesture event.
    pub fn handle_zone_event(&mut self, cx: &mut PaneContext<'_>, event: &ZoneEvent) -> bool {
        if event.target != self.id || event.zone != cx.zone.zone_id() {
            return false;
        }
        match event.kind {
            ZoneEventKind::MoveStart => self.snap_moving = true,
            ZoneEventKind::MoveEnd => self.snap_moving = false,
            ZoneEventKind::Move { delta } => {
                let target = self.position + delta;
                self.set_position(cx.space, target, BoundsChangeReason::User);
                cx.zone.note_window_position(self.position);
            }
            ZoneEventKind::Resize { delta } => {
                let size = Size::new(self.size.width + delta.x, self.size.height + delta.y);
                self.set_size(size, BoundsChangeReason::User);
            }
        }
        self.report(cx);
        true
    }

    /// Jump flush against a snap partner.
    pub fn apply_to_snap(&mut self, cx: &mut PaneContext<'_>, to_snap: &ToSnap) -> bool {
        if to_snap.target != self.id {
            return false;
        }
        self.set_size(to_snap.size, BoundsChangeReason::System);
        self.set_position(cx.space, to_snap.position, BoundsChangeReason::System);
        self.report(cx);
        trace!(pane = %self.id, "snap applied");
        true
    }

    /// Pull the pane back on-screen after the stage changed size.
    pub fn stage_resized(&mut self, cx: &mut PaneContext<'_>, previous: Size) -> bool {
        if previous == cx.space.size() {
            return false;
        }
        self.pull_onto_stage(cx)
    }

    /// Pull the pane back on-screen after the stage scale changed. The stage
    /// size is the same, but the pane's scaled extent is not.
    pub fn stage_rescaled(&mut self, cx: &mut PaneContext<'_>) -> bool {
        self.pull_onto_stage(cx)
    }

    fn pull_onto_stage(&mut self, cx: &mut PaneContext<'_>) -> bool {
        if self.options.allow_outside || !self.options.compensate_on_viewport_resize {
            return false;
        }
        let stage = cx.space.size();
        let scaled = cx.space.scale_size(self.size);
        let mut target = self.position;
        if target.x + scaled.width > stage.width {
            target.x = stage.width - scaled.width;
        }
        if target.y + scaled.height > stage.height {
            target.y = stage.height - scaled.height;
        }
        let moved = self.set_position(cx.space, target.non_negative(), BoundsChangeReason::System);
        if moved {
            if !self.is_staged() {
                cx.zone.note_window_position(self.position);
            }
            self.report(cx);
        }
        moved
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// Classify the part of the pane under `pointer`.
    #[must_use]
    pub fn hit_test(&self, space: &dyn CoordinateSpace, pointer: Point) -> Option<PaneHit> {
        if self.is_staged() {
            return None;
        }
        let rect = self.rect(space);
        if self.options.resizable
            && let Some(grip) = classify_resize_grip(rect, pointer, RESIZE_HANDLE_INSET)
        {
            return Some(PaneHit::Resize(grip));
        }
        if !rect.contains(pointer) {
            return None;
        }
        let (title, _) = rect.split_top(space.scale_y(self.options.title_bar_height));
        Some(if title.contains(pointer) {
            PaneHit::TitleBar
        } else {
            PaneHit::Content
        })
    }

    /// Pointer hover over the pane. Reveals resizers inside the threshold
    /// band and returns the grip directly under the pointer.
    pub fn hover(&mut self, space: &dyn CoordinateSpace, pointer: Point) -> Option<ResizeGrip> {
        if !self.options.resizable || self.is_staged() || self.gesture != PaneGesture::Idle {
            self.show_resizers = false;
            return None;
        }
        let rect = self.rect(space);
        let grip = classify_resize_grip(rect, pointer, RESIZE_HANDLE_INSET);
        let band_x = space.scale_x(self.options.resizer_threshold);
        let band_y = space.scale_y(self.options.resizer_threshold);
        let local = Point::new(pointer.x - rect.x, pointer.y - rect.y);
        let in_band = rect.contains(pointer)
            && (local.x < band_x
                || local.y < band_y
                || local.x > rect.width - band_x
                || local.y > rect.height - band_y);
        self.show_resizers = grip.is_some() || in_band;
        grip
    }

    pub fn pointer_leave(&mut self) {
        self.show_resizers = false;
    }
}
