#![forbid(unsafe_code)]

//! Zones: window registries with magnetic snapping.
//!
//! A [`Zone`] tracks every pane mounted in it, searches for horizontal
//! neighbours on each bounds update, promotes candidates to finalized snaps
//! when a gesture ends, and drives synchronized drags of snapped pairs
//! through its [`ZoneDispatcher`].
//!
//! # State Machine
//!
//! ```text
//!   no candidate ──bounds update, 1..=2 neighbours──▶ candidate (Snapping)
//!        ▲                                                │
//!        └──────────── gesture end ──▶ Snap + ToSnap ◀────┘
//! ```
//!
//! # Invariants
//!
//! 1. The registry is updated before any neighbour search for the same call.
//! 2. Zero or more than two neighbours clears the candidate and every snap of
//!    the reporting window; three-way snaps are never formed.
//! 3. Updates from a window held by a synchronized snap gesture never create
//!    candidates.
//! 4. After [`Zone::flush_unmounted`], no record, snap, candidate, pending
//!    [`ToSnap`] or queued event references a flushed id.
//!
//! # Failure Modes
//!
//! Lookups of ids that are not registered (for example a report racing an
//! unmount) are treated as "not snappable right now" and return early.

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Rect, Size};
use stagehand_core::scale::CoordinateSpace;
use tracing::{debug, trace};

use crate::dispatch::{ZoneDispatcher, ZoneEvent, ZoneEventKind};
use crate::id::{PaneId, ZoneId};
use crate::registry::{BoundsReport, ClockPosition, WindowRecord, WindowRegistry};
use crate::snap::{Snap, SnapKey, SnapSet, SnapWith, Snapping, ToSnap};

/// Initial value of the per-zone focus counter.
pub const ZONE_Z_INDEX_START: u64 = 1000;

/// Offset added to the z-index of always-on-top panes.
pub const ALWAYS_ON_TOP_Z_INDEX: u64 = 1_000_000;

/// Pointer x (stage pixels) at or below which an auto-hiding tray is revealed.
pub const TRAY_REVEAL_DISTANCE: f64 = 150.0;

/// Height of the move handle at the top of a snap gap; the rest of the gap
/// is the resize handle.
pub const SNAP_MOVER_HEIGHT: f64 = 24.0;

/// Horizontal slack around a snap gap that still grabs its handles.
pub const SNAP_HANDLE_SLOP: f64 = 4.0;

/// Zone behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Hide the staging tray until the pointer approaches it.
    pub auto_hide_stageds: bool,
    /// Width of the staging tray in pixels.
    pub stageds_width: f64,
    /// Enable magnetic snapping.
    pub snap: bool,
    /// Gap left between two snapped windows.
    pub snap_margin: f64,
    /// Maximum edge distance, in stage pixels, that counts as adjacent.
    pub snap_threshold: f64,
    pub snap_with: SnapWith,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            auto_hide_stageds: false,
            stageds_width: 150.0,
            snap: true,
            snap_margin: 20.0,
            snap_threshold: 50.0,
            snap_with: SnapWith::All,
        }
    }
}

impl ZoneConfig {
    /// Validate all parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.stageds_width.is_finite() || self.stageds_width < 0.0 {
            errors.push(format!(
                "zone.stageds_width must be >= 0, got {}",
                self.stageds_width
            ));
        }
        if !self.snap_margin.is_finite() || self.snap_margin < 0.0 {
            errors.push(format!(
                "zone.snap_margin must be >= 0, got {}",
                self.snap_margin
            ));
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            errors.push(format!(
                "zone.snap_threshold must be >= 0, got {}",
                self.snap_threshold
            ));
        }
        errors
    }
}

/// Kind of synchronized drag on a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapGestureKind {
    /// Drag both windows together.
    Move,
    /// Drag the shared edge.
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SnapGesture {
    key: SnapKey,
    kind: SnapGestureKind,
    last_pointer: Point,
}

/// The narrow capability a pane uses to talk to its zone.
pub trait ZoneLink {
    fn zone_id(&self) -> ZoneId;

    /// Report new bounds for `id`. Called on every change while a gesture runs.
    fn on_window_bounds_changed(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    );

    /// Report the end of a user gesture. Returns the snap instruction, if any.
    fn on_user_bounds_change_end(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    ) -> Option<ToSnap>;

    /// Raise `id` to the top of the zone. Returns its new z-index.
    fn focus_window(&mut self, id: PaneId, always_on_top: bool) -> u64;

    fn focused_window(&self) -> Option<PaneId>;

    /// Remember where the most recent window was placed.
    fn note_window_position(&mut self, position: Point);

    fn last_window_position(&self) -> Point;

    /// Schedule `id` for removal at the next flush.
    fn queue_unmount(&mut self, id: PaneId);

    /// Width of the staging tray.
    fn tray_width(&self) -> f64;
}

/// One window-hosting region.
#[derive(Debug, Clone)]
pub struct Zone {
    id: ZoneId,
    config: ZoneConfig,
    registry: WindowRegistry,
    snaps: SnapSet,
    candidate: Option<Snapping>,
    to_snap: Option<ToSnap>,
    dispatcher: ZoneDispatcher,
    z_counter: u64,
    focused: Option<PaneId>,
    last_window_position: Point,
    unmounted: Vec<PaneId>,
    gesture: Option<SnapGesture>,
}

impl Zone {
    #[must_use]
    pub fn new(id: ZoneId, config: ZoneConfig) -> Self {
        Self {
            id,
            config,
            registry: WindowRegistry::new(),
            snaps: SnapSet::new(),
            candidate: None,
            to_snap: None,
            dispatcher: ZoneDispatcher::new(id),
            z_counter: ZONE_Z_INDEX_START,
            focused: None,
            last_window_position: Point::ZERO,
            unmounted: Vec::new(),
            gesture: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ZoneId {
        self.id
    }

    #[must_use]
    pub const fn config(&self) -> &ZoneConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    #[must_use]
    pub fn window(&self, id: PaneId) -> Option<&WindowRecord> {
        self.registry.get(id)
    }

    #[must_use]
    pub const fn snaps(&self) -> &SnapSet {
        &self.snaps
    }

    /// Current provisional candidate.
    #[must_use]
    pub const fn candidate(&self) -> Option<&Snapping> {
        self.candidate.as_ref()
    }

    /// Latest unapplied snap instruction.
    #[must_use]
    pub const fn pending_to_snap(&self) -> Option<&ToSnap> {
        self.to_snap.as_ref()
    }

    /// Take the latest snap instruction for delivery to panes.
    pub fn take_to_snap(&mut self) -> Option<ToSnap> {
        self.to_snap.take()
    }

    /// Take queued synchronized-drag events in dispatch order.
    pub fn drain_events(&mut self) -> Vec<ZoneEvent> {
        self.dispatcher.drain()
    }

    #[must_use]
    pub const fn z_counter(&self) -> u64 {
        self.z_counter
    }

    /// Ids queued for removal but not yet flushed.
    #[must_use]
    pub fn pending_unmounts(&self) -> &[PaneId] {
        &self.unmounted
    }

    /// Active synchronized gesture, if any.
    #[must_use]
    pub fn snap_gesture(&self) -> Option<(SnapKey, SnapGestureKind)> {
        self.gesture.map(|g| (g.key, g.kind))
    }

    /// Whether the staging tray should be shown for this pointer position.
    #[must_use]
    pub fn tray_visible(&self, pointer: Point) -> bool {
        !self.config.auto_hide_stageds || pointer.x <= TRAY_REVEAL_DISTANCE
    }

    // -----------------------------------------------------------------------
    // Bounds protocol
    // -----------------------------------------------------------------------

    fn gesture_flags(&self, id: PaneId) -> (bool, bool) {
        match self.gesture {
            Some(g) if g.key.contains(id) => (
                g.kind == SnapGestureKind::Move,
                g.kind == SnapGestureKind::Resize,
            ),
            _ => (false, false),
        }
    }

    fn purge_snaps(&mut self, id: PaneId) {
        let dropped = self.snaps.remove_involving(id);
        if dropped > 0 {
            debug!(zone = %self.id, pane = %id, dropped, "snaps purged");
        }
    }

    /// Neighbours of `id` within threshold, in ascending id order.
    ///
    /// Also refreshes every other record's clock marker.
    fn nearby_windows(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: &BoundsReport,
    ) -> Vec<(PaneId, ClockPosition)> {
        let threshold = self.config.snap_threshold;
        let left = report.position.x;
        let right = report.position.x + space.scale_x(report.size.width);
        let top = report.position.y;
        let bottom = report.position.y + space.scale_y(report.size.height);

        let mut nearby = Vec::new();
        for other in self.registry.iter_mut() {
            other.clock_position = None;
            if other.id == id || other.staged {
                continue;
            }
            let top_gap = (other.position.y - top).abs();
            let bottom_gap = (other.bottom_edge(space) - bottom).abs();
            if top_gap > threshold || bottom_gap > threshold {
                continue;
            }
            let clock = if (other.right_edge(space) - left).abs() <= threshold {
                ClockPosition::Left
            } else if (other.position.x - right).abs() <= threshold {
                ClockPosition::Right
            } else {
                continue;
            };
            other.clock_position = Some(clock);
            nearby.push((other.id, clock));
        }
        nearby.sort_by_key(|(id, _)| *id);
        nearby
    }

    /// Bounds update from a pane. See [`ZoneLink::on_window_bounds_changed`].
    pub fn on_window_bounds_changed(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    ) {
        if !self.config.snap {
            self.registry.upsert(id, report);
            self.candidate = None;
            self.to_snap = None;
            self.snaps.clear();
            return;
        }

        if report.staged {
            self.registry.upsert(id, report);
            self.candidate = None;
            if self.to_snap.is_some_and(|t| t.involves(id)) {
                self.to_snap = None;
            }
            self.purge_snaps(id);
            return;
        }

        let (held_moving, held_resizing) = self.gesture_flags(id);
        let record = self.registry.upsert(id, report);
        record.moving |= held_moving;
        record.resizing |= held_resizing;
        let held = held_moving || held_resizing;

        let nearby = self.nearby_windows(space, id, &report);

        // The dragged snap's members report one at a time, so mid-gesture the
        // partner can sit out of range until its own update lands.
        let held_key = self.gesture.map(|g| g.key).filter(|k| k.contains(id));
        for key in self.snaps.keys_involving(id) {
            if held_key == Some(key) {
                continue;
            }
            let partner_nearby = key
                .partner_of(id)
                .is_some_and(|p| nearby.iter().any(|(n, _)| *n == p));
            if !partner_nearby {
                self.snaps.remove(key);
                debug!(zone = %self.id, pane = %id, "snap dropped, partner out of range");
            }
        }

        if held {
            return;
        }

        if nearby.is_empty() || nearby.len() > 2 {
            if nearby.len() > 2 {
                trace!(zone = %self.id, pane = %id, count = nearby.len(), "ambiguous neighbours");
            }
            self.candidate = None;
            self.purge_snaps(id);
            return;
        }

        if !self.config.snap_with.permits_update(report.moving, report.resizing) {
            return;
        }

        for (other, clock) in nearby {
            let key = SnapKey::new(id, other);
            if self.snaps.get(key).is_some_and(|s| !s.is_held()) {
                self.snaps.remove(key);
            }
            let next = match clock {
                ClockPosition::Left => Snapping::horizontal(id, other, id),
                ClockPosition::Right => Snapping::horizontal(id, id, other),
            };
            if self.candidate.as_ref() != Some(&next) {
                trace!(zone = %self.id, left = %next.left, right = %next.right, "snap candidate");
                self.candidate = Some(next);
            }
        }
    }

    /// End of a user gesture. See [`ZoneLink::on_user_bounds_change_end`].
    pub fn on_user_bounds_change_end(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    ) -> Option<ToSnap> {
        let candidate = self.candidate.take().filter(|c| {
            c.involves(id) && self.config.snap_with.permits_end(report.moving, report.resizing)
        });
        let Some(candidate) = candidate else {
            if report.staged {
                self.purge_snaps(id);
            }
            return None;
        };

        let other_id = candidate.partner_of(id)?;
        let other = *self.registry.get(other_id)?;
        let staged = self.registry.get(id)?.staged || report.staged;
        self.purge_snaps(id);
        if staged || other.staged {
            return None;
        }

        let margin = self.config.snap_margin;
        let position = if candidate.left == other_id {
            Point::new(other.right_edge(space) + margin, other.position.y)
        } else {
            Point::new(
                other.position.x - space.scale_x(report.size.width) - margin,
                other.position.y,
            )
        };
        let size = Size::new(report.size.width, other.size.height);

        let to_snap = ToSnap {
            target: id,
            windows: [candidate.left, candidate.right],
            position,
            size,
        };
        self.to_snap = Some(to_snap);
        let mut snap = Snap::from(Snapping { interacted: id, ..candidate });
        if self.focused.is_some_and(|f| snap.involves(f)) {
            snap.z_index = self.z_counter;
        }
        self.snaps.insert(snap);
        debug!(
            zone = %self.id,
            left = %candidate.left,
            right = %candidate.right,
            x = position.x,
            y = position.y,
            "snap finalized"
        );
        Some(to_snap)
    }

    // -----------------------------------------------------------------------
    // Focus and placement
    // -----------------------------------------------------------------------

    /// Raise `id`; see [`ZoneLink::focus_window`].
    pub fn focus_window(&mut self, id: PaneId, always_on_top: bool) -> u64 {
        self.z_counter += 1;
        self.focused = Some(id);
        let counter = self.z_counter;
        for snap in self.snaps.involving_mut(id) {
            snap.z_index = counter;
        }
        counter + if always_on_top { ALWAYS_ON_TOP_Z_INDEX } else { 0 }
    }

    #[must_use]
    pub const fn focused_window(&self) -> Option<PaneId> {
        self.focused
    }

    pub fn note_window_position(&mut self, position: Point) {
        self.last_window_position = position.non_negative();
    }

    #[must_use]
    pub const fn last_window_position(&self) -> Point {
        self.last_window_position
    }

    // -----------------------------------------------------------------------
    // Synchronized snap gestures
    // -----------------------------------------------------------------------

    /// Start dragging a snap. Returns `false` if another gesture is active or
    /// the snap no longer exists.
    pub fn begin_snap_gesture(&mut self, key: SnapKey, kind: SnapGestureKind, pointer: Point) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(snap) = self.snaps.get_mut(key) else {
            return false;
        };
        match kind {
            SnapGestureKind::Move => snap.snap_moving = true,
            SnapGestureKind::Resize => snap.snap_resizing = true,
        }
        let members = [snap.left, snap.right];
        for id in members {
            if let Some(record) = self.registry.get_mut(id) {
                match kind {
                    SnapGestureKind::Move => record.moving = true,
                    SnapGestureKind::Resize => record.resizing = true,
                }
            }
            if kind == SnapGestureKind::Move {
                self.dispatcher.dispatch(id, ZoneEventKind::MoveStart);
            }
        }
        self.gesture = Some(SnapGesture {
            key,
            kind,
            last_pointer: pointer,
        });
        debug!(zone = %self.id, ?kind, "snap gesture started");
        true
    }

    /// Feed a pointer position to the active snap gesture, enqueuing events.
    ///
    /// A resize is limited so neither window leaves its width limits. Travel
    /// past the limit is dropped, so the gap only follows again once the
    /// pointer comes back to it.
    ///
    /// Returns whether any events were dispatched.
    pub fn update_snap_gesture(&mut self, space: &dyn CoordinateSpace, pointer: Point) -> bool {
        let Some(gesture) = self.gesture else {
            return false;
        };
        let Some(snap) = self.snaps.get(gesture.key) else {
            self.set_gesture_pointer(pointer);
            return false;
        };
        let (left, right) = (snap.left, snap.right);
        let delta = pointer - gesture.last_pointer;
        if delta == Point::ZERO {
            return false;
        }
        match gesture.kind {
            SnapGestureKind::Move => {
                self.set_gesture_pointer(pointer);
                self.dispatcher.dispatch(left, ZoneEventKind::Move { delta });
                self.dispatcher.dispatch(right, ZoneEventKind::Move { delta });
                true
            }
            SnapGestureKind::Resize => {
                let requested = space.revert_scale_x(delta.x);
                let width = self.shared_edge_travel(left, right, requested);
                let dx = if width == requested {
                    delta.x
                } else {
                    space.scale_x(width)
                };
                self.set_gesture_pointer(Point::new(gesture.last_pointer.x + dx, pointer.y));
                if width == 0.0 {
                    trace!(zone = %self.id, requested, "snap resize at width limit");
                    return false;
                }
                self.dispatcher.dispatch(
                    left,
                    ZoneEventKind::Resize {
                        delta: Point::new(width, 0.0),
                    },
                );
                self.dispatcher.dispatch(
                    right,
                    ZoneEventKind::Resize {
                        delta: Point::new(-width, 0.0),
                    },
                );
                self.dispatcher.dispatch(
                    right,
                    ZoneEventKind::Move {
                        delta: Point::new(dx, 0.0),
                    },
                );
                true
            }
        }
    }

    fn set_gesture_pointer(&mut self, pointer: Point) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.last_pointer = pointer;
        }
    }

    /// Limit an unscaled shared-edge shift so the left window grows by it
    /// and the right one shrinks by it, both within their width limits.
    fn shared_edge_travel(&self, left: PaneId, right: PaneId, requested: f64) -> f64 {
        let (l_shrink, l_grow) = self
            .registry
            .get(left)
            .map_or((f64::NEG_INFINITY, f64::INFINITY), WindowRecord::width_slack);
        let (r_shrink, r_grow) = self
            .registry
            .get(right)
            .map_or((f64::NEG_INFINITY, f64::INFINITY), WindowRecord::width_slack);
        let lo = l_shrink.max(-r_grow);
        let hi = l_grow.min(-r_shrink);
        requested.max(lo).min(hi)
    }

    /// Finish the active snap gesture. Returns `false` if none was active.
    pub fn end_snap_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        if let Some(snap) = self.snaps.get_mut(gesture.key) {
            match gesture.kind {
                SnapGestureKind::Move => snap.snap_moving = false,
                SnapGestureKind::Resize => snap.snap_resizing = false,
            }
        }
        for id in gesture.key.ids() {
            if let Some(record) = self.registry.get_mut(id) {
                match gesture.kind {
                    SnapGestureKind::Move => record.moving = false,
                    SnapGestureKind::Resize => record.resizing = false,
                }
            }
            if gesture.kind == SnapGestureKind::Move {
                self.dispatcher.dispatch(id, ZoneEventKind::MoveEnd);
            }
        }
        debug!(zone = %self.id, kind = ?gesture.kind, "snap gesture ended");
        true
    }

    // -----------------------------------------------------------------------
    // Snap geometry
    // -----------------------------------------------------------------------

    fn gap_between(&self, space: &dyn CoordinateSpace, left: PaneId, right: PaneId) -> Option<Rect> {
        let l = self.registry.get(left)?;
        let r = self.registry.get(right)?;
        let left_right = l.right_edge(space);
        Some(Rect::new(
            left_right.min(r.position.x),
            l.position.y,
            (r.position.x - left_right).abs(),
            space.scale_y(l.size.height),
        ))
    }

    /// Stage-pixel rectangle between the two windows of a snap.
    #[must_use]
    pub fn snap_gap(&self, space: &dyn CoordinateSpace, snap: &Snap) -> Option<Rect> {
        self.gap_between(space, snap.left, snap.right)
    }

    /// Indicator rectangle for the current candidate.
    #[must_use]
    pub fn candidate_gap(&self, space: &dyn CoordinateSpace) -> Option<Rect> {
        let c = self.candidate?;
        self.gap_between(space, c.left, c.right)
    }

    /// Find the snap handle under `pointer`, topmost snap first.
    #[must_use]
    pub fn snap_handle_at(
        &self,
        space: &dyn CoordinateSpace,
        pointer: Point,
    ) -> Option<(SnapKey, SnapGestureKind)> {
        let mut snaps: Vec<&Snap> = self.snaps.iter().collect();
        snaps.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        snaps.into_iter().find_map(|snap| {
            let gap = self.snap_gap(space, snap)?;
            let grab = Rect::new(
                gap.x - SNAP_HANDLE_SLOP,
                gap.y,
                gap.width + 2.0 * SNAP_HANDLE_SLOP,
                gap.height,
            );
            if !grab.contains(pointer) {
                return None;
            }
            let (mover, _) = grab.split_top(SNAP_MOVER_HEIGHT);
            let kind = if mover.contains(pointer) {
                SnapGestureKind::Move
            } else {
                SnapGestureKind::Resize
            };
            Some((snap.key(), kind))
        })
    }

    // -----------------------------------------------------------------------
    // Unmount
    // -----------------------------------------------------------------------

    pub fn queue_unmount(&mut self, id: PaneId) {
        if !self.unmounted.contains(&id) {
            self.unmounted.push(id);
        }
    }

    /// Purge every queued id from the registry, snaps, candidate, pending
    /// instruction, focus, active gesture and event queue.
    pub fn flush_unmounted(&mut self) -> Vec<PaneId> {
        let ids = std::mem::take(&mut self.unmounted);
        for &id in &ids {
            self.registry.remove(id);
            self.snaps.remove_involving(id);
            self.dispatcher.forget(id);
            if self.candidate.is_some_and(|c| c.involves(id)) {
                self.candidate = None;
            }
            if self.to_snap.is_some_and(|t| t.involves(id)) {
                self.to_snap = None;
            }
            if self.focused == Some(id) {
                self.focused = None;
            }
            if self.gesture.is_some_and(|g| g.key.contains(id)) {
                self.gesture = None;
            }
        }
        if !ids.is_empty() {
            debug!(zone = %self.id, count = ids.len(), "unmounted windows flushed");
        }
        ids
    }
}

impl ZoneLink for Zone {
    fn zone_id(&self) -> ZoneId {
        self.id
    }

    fn on_window_bounds_changed(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    ) {
        Zone::on_window_bounds_changed(self, space, id, report);
    }

    fn on_user_bounds_change_end(
        &mut self,
        space: &dyn CoordinateSpace,
        id: PaneId,
        report: BoundsReport,
    ) -> Option<ToSnap> {
        Zone::on_user_bounds_change_end(self, space, id, report)
    }

    fn focus_window(&mut self, id: PaneId, always_on_top: bool) -> u64 {
        Zone::focus_window(self, id, always_on_top)
    }

    fn focused_window(&self) -> Option<PaneId> {
        self.focused
    }

    fn note_window_position(&mut self, position: Point) {
        Zone::note_window_position(self, position);
    }

    fn last_window_position(&self) -> Point {
        self.last_window_position
    }

    fn queue_unmount(&mut self, id: PaneId) {
        Zone::queue_unmount(self, id);
    }

    fn tray_width(&self) -> f64 {
        self.config.stageds_width
    }
}
