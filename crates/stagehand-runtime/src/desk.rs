#![forbid(unsafe_code)]

//! The desk: one stage, several spaces, one input tick at a time.
//!
//! A [`Desk`] owns the [`Stage`] and a list of spaces, each a [`Zone`] with
//! the panes mounted in it. Exactly one space is active and receives pointer
//! input.
//!
//! # Tick
//!
//! Every entry point processes one input to completion:
//!
//! 1. stage input (pointer made stage-local, button state published),
//! 2. snap gesture or pane gesture for the active space,
//! 3. synchronized zone events delivered to their target panes,
//! 4. the zone's pending snap instruction applied to its target,
//! 5. focus synchronized across panes,
//! 6. queued unmounts flushed,
//! 7. pane and window events moved to the desk outbox.

use std::fmt;

use serde::Serialize;
use stagehand_core::event::{PointerEvent, PointerEventKind};
use stagehand_core::geometry::{Point, Rect, Size};
use stagehand_core::scale::{CoordinateSpace, Scale, StageFrame};
use stagehand_core::stage::Stage;
use stagehand_layout::basic::{BasicWindow, BasicWindowEvent, BasicWindowOptions};
use stagehand_layout::id::{PaneId, PaneIdAllocator, PaneIdError, ZoneId};
use stagehand_layout::pane::{
    Pane, PaneContext, PaneEvent, PaneGesture, PaneHit, PaneOptions, PaneOptionsError,
};
use stagehand_layout::zone::Zone;
use tracing::{debug, trace};

use crate::config::{ConfigError, DeskConfig};

// ---------------------------------------------------------------------------
// Events and errors
// ---------------------------------------------------------------------------

/// Payload of a [`DeskEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum DeskEventKind {
    Pane { event: PaneEvent },
    Window { event: BasicWindowEvent },
}

/// One observable change, tagged with where it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeskEvent {
    pub space: ZoneId,
    pub pane: PaneId,
    pub kind: DeskEventKind,
}

/// Desk operation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum DeskError {
    Ids(PaneIdError),
    Options(PaneOptionsError),
    UnknownSpace { index: usize, count: usize },
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ids(e) => write!(f, "pane id allocation failed: {e}"),
            Self::Options(e) => write!(f, "invalid pane options: {e}"),
            Self::UnknownSpace { index, count } => {
                write!(f, "space index {index} out of range (have {count})")
            }
        }
    }
}

impl std::error::Error for DeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ids(e) => Some(e),
            Self::Options(e) => Some(e),
            Self::UnknownSpace { .. } => None,
        }
    }
}

impl From<PaneIdError> for DeskError {
    fn from(e: PaneIdError) -> Self {
        Self::Ids(e)
    }
}

impl From<PaneOptionsError> for DeskError {
    fn from(e: PaneOptionsError) -> Self {
        Self::Options(e)
    }
}

// ---------------------------------------------------------------------------
// Spaces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Window {
    Plain(Pane),
    Basic(BasicWindow),
}

impl Window {
    fn pane(&self) -> &Pane {
        match self {
            Self::Plain(pane) => pane,
            Self::Basic(window) => window.pane(),
        }
    }

    fn pane_mut(&mut self) -> &mut Pane {
        match self {
            Self::Plain(pane) => pane,
            Self::Basic(window) => window.pane_mut(),
        }
    }

    fn drain_into(&mut self, space: ZoneId, out: &mut Vec<DeskEvent>) {
        let pane = self.pane().id();
        out.extend(self.pane_mut().drain_events().into_iter().map(|event| DeskEvent {
            space,
            pane,
            kind: DeskEventKind::Pane { event },
        }));
        if let Self::Basic(window) = self {
            out.extend(window.drain_events().into_iter().map(|event| DeskEvent {
                space,
                pane,
                kind: DeskEventKind::Window { event },
            }));
        }
    }
}

#[derive(Debug, Clone)]
struct Space {
    zone: Zone,
    windows: Vec<Window>,
}

impl Space {
    fn position_of(&self, id: PaneId) -> Option<usize> {
        self.windows.iter().position(|w| w.pane().id() == id)
    }

    fn mount(&mut self, frame: &StageFrame, mut window: Window) {
        window
            .pane_mut()
            .mount(&mut PaneContext::new(frame, &mut self.zone));
        self.windows.push(window);
    }

    /// Topmost docked pane under `pointer` and the part that was hit.
    fn topmost_hit(&self, frame: &StageFrame, pointer: Point) -> Option<(usize, PaneHit)> {
        self.windows
            .iter()
            .enumerate()
            .filter_map(|(idx, w)| {
                let pane = w.pane();
                pane.hit_test(frame, pointer)
                    .map(|hit| (idx, hit, pane.effective_z_index()))
            })
            .max_by_key(|(_, _, z)| *z)
            .map(|(idx, hit, _)| (idx, hit))
    }

    fn pointer_down(&mut self, frame: &StageFrame, pointer: Point) -> bool {
        if let Some((key, kind)) = self.zone.snap_handle_at(frame, pointer)
            && self.zone.begin_snap_gesture(key, kind, pointer)
        {
            self.deliver_zone_events(frame);
            return true;
        }
        let Some((idx, hit)) = self.topmost_hit(frame, pointer) else {
            return false;
        };
        let Some(window) = self.windows.get_mut(idx) else {
            return false;
        };
        let pane = window.pane_mut();
        let mut cx = PaneContext::new(frame, &mut self.zone);
        match hit {
            PaneHit::Resize(grip) => pane.begin_resize(&mut cx, grip, pointer),
            PaneHit::TitleBar => pane.begin_move(&mut cx, pointer),
            PaneHit::Content => {
                pane.focus(&mut cx);
                true
            }
        }
    }

    fn pointer_moved(&mut self, frame: &StageFrame, pointer: Point) -> bool {
        if self.zone.snap_gesture().is_some() {
            let moved = self.zone.update_snap_gesture(frame, pointer);
            self.deliver_zone_events(frame);
            return moved;
        }
        let mut consumed = false;
        for window in &mut self.windows {
            let pane = window.pane_mut();
            if pane.gesture() != PaneGesture::Idle {
                consumed |= pane.pointer_moved(&mut PaneContext::new(frame, &mut self.zone), pointer);
            }
        }
        if !consumed {
            for window in &mut self.windows {
                let pane = window.pane_mut();
                if pane.hit_test(frame, pointer).is_some() {
                    pane.hover(frame, pointer);
                } else {
                    pane.pointer_leave();
                }
            }
        }
        consumed
    }

    fn pointer_up(&mut self, frame: &StageFrame) -> bool {
        let mut consumed = false;
        if self.zone.end_snap_gesture() {
            self.deliver_zone_events(frame);
            consumed = true;
        }
        for window in &mut self.windows {
            consumed |= window
                .pane_mut()
                .release(&mut PaneContext::new(frame, &mut self.zone));
        }
        consumed
    }

    fn deliver_zone_events(&mut self, frame: &StageFrame) {
        for event in self.zone.drain_events() {
            let Some(window) = self
                .windows
                .iter_mut()
                .find(|w| w.pane().id() == event.target)
            else {
                continue;
            };
            window
                .pane_mut()
                .handle_zone_event(&mut PaneContext::new(frame, &mut self.zone), &event);
        }
    }

    /// Steps 4 to 6 of the tick.
    fn settle(&mut self, frame: &StageFrame) {
        if let Some(to_snap) = self.zone.take_to_snap()
            && let Some(window) = self
                .windows
                .iter_mut()
                .find(|w| w.pane().id() == to_snap.target)
        {
            window
                .pane_mut()
                .apply_to_snap(&mut PaneContext::new(frame, &mut self.zone), &to_snap);
        }
        let focused = self.zone.focused_window();
        for window in &mut self.windows {
            window.pane_mut().sync_focus(focused);
        }
        self.zone.flush_unmounted();
    }

    fn drain_into(&mut self, out: &mut Vec<DeskEvent>) {
        let space = self.zone.id();
        for window in &mut self.windows {
            window.drain_into(space, out);
        }
    }
}

// ---------------------------------------------------------------------------
// Desk
// ---------------------------------------------------------------------------

/// Host that routes pointer input through stage, zones and panes.
#[derive(Debug)]
pub struct Desk {
    stage: Stage,
    config: DeskConfig,
    spaces: Vec<Space>,
    active: usize,
    ids: PaneIdAllocator,
    events: Vec<DeskEvent>,
}

impl Desk {
    /// Build a desk with `config.spaces` empty spaces. The first is active.
    pub fn new(config: DeskConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let mut desk = Self {
            stage: Stage::new(config.stage),
            spaces: Vec::with_capacity(config.spaces),
            active: 0,
            ids: PaneIdAllocator::new(),
            events: Vec::new(),
            config,
        };
        for _ in 0..desk.config.spaces {
            desk.add_space();
        }
        Ok(desk)
    }

    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub const fn config(&self) -> &DeskConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Spaces
    // -----------------------------------------------------------------------

    /// Append an empty space and return its zone id.
    pub fn add_space(&mut self) -> ZoneId {
        let raw = u32::try_from(self.spaces.len() + 1).unwrap_or(u32::MAX);
        let id = ZoneId::new(raw);
        self.spaces.push(Space {
            zone: Zone::new(id, self.config.zone),
            windows: Vec::new(),
        });
        debug!(space = %id, count = self.spaces.len(), "space added");
        id
    }

    #[must_use]
    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_zone(&self) -> Option<&Zone> {
        self.spaces.get(self.active).map(|s| &s.zone)
    }

    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.spaces.iter().map(|s| &s.zone).find(|z| z.id() == id)
    }

    /// Activate the previous space, staying on the first one.
    pub fn previous_space(&mut self) -> usize {
        self.switch_to(self.active.saturating_sub(1));
        self.active
    }

    /// Activate the next space, staying on the last one.
    pub fn next_space(&mut self) -> usize {
        let last = self.spaces.len().saturating_sub(1);
        self.switch_to((self.active + 1).min(last));
        self.active
    }

    pub fn select_space(&mut self, index: usize) -> Result<(), DeskError> {
        if index >= self.spaces.len() {
            return Err(DeskError::UnknownSpace {
                index,
                count: self.spaces.len(),
            });
        }
        self.switch_to(index);
        Ok(())
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.active {
            return;
        }
        let frame = self.stage.frame();
        if let Some(space) = self.spaces.get_mut(self.active) {
            space.pointer_up(&frame);
            space.settle(&frame);
        }
        debug!(from = self.active, to = index, "space switched");
        self.active = index;
        self.collect_events();
    }

    // -----------------------------------------------------------------------
    // Windows
    // -----------------------------------------------------------------------

    /// Mount a pane in the active space.
    pub fn open_pane(&mut self, options: PaneOptions) -> Result<PaneId, DeskError> {
        let id = self.ids.allocate()?;
        let pane = Pane::new(id, options)?;
        self.mount_active(Window::Plain(pane))?;
        Ok(id)
    }

    /// Mount a pane built from the desk's base pane options.
    pub fn open_default_pane(&mut self) -> Result<PaneId, DeskError> {
        self.open_pane(self.config.pane)
    }

    /// Mount a [`BasicWindow`] in the active space.
    pub fn open_basic_window(&mut self, options: BasicWindowOptions) -> Result<PaneId, DeskError> {
        let id = self.ids.allocate()?;
        let count = self.spaces.len();
        let space = self
            .spaces
            .get(self.active)
            .ok_or(DeskError::UnknownSpace {
                index: self.active,
                count,
            })?;
        let window = BasicWindow::new(id, options, self.config.pane, &space.zone)?;
        self.mount_active(Window::Basic(window))?;
        Ok(id)
    }

    fn mount_active(&mut self, window: Window) -> Result<(), DeskError> {
        let frame = self.stage.frame();
        let count = self.spaces.len();
        let space = self
            .spaces
            .get_mut(self.active)
            .ok_or(DeskError::UnknownSpace {
                index: self.active,
                count,
            })?;
        space.mount(&frame, window);
        space.settle(&frame);
        self.collect_events();
        Ok(())
    }

    /// Unmount and drop a pane from whichever space holds it.
    pub fn close_pane(&mut self, id: PaneId) -> bool {
        let frame = self.stage.frame();
        let Some((space, idx)) = self.locate_mut(id) else {
            return false;
        };
        let mut window = space.windows.remove(idx);
        window.pane_mut().unmount(&mut space.zone);
        let zone_id = space.zone.id();
        space.settle(&frame);
        window.drain_into(zone_id, &mut self.events);
        self.collect_events();
        debug!(pane = %id, "pane closed");
        true
    }

    fn locate_mut(&mut self, id: PaneId) -> Option<(&mut Space, usize)> {
        self.spaces.iter_mut().find_map(|space| {
            let idx = space.position_of(id)?;
            Some((space, idx))
        })
    }

    fn locate(&self, id: PaneId) -> Option<(&Space, usize)> {
        self.spaces.iter().find_map(|space| {
            let idx = space.position_of(id)?;
            Some((space, idx))
        })
    }

    #[must_use]
    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        let (space, idx) = self.locate(id)?;
        space.windows.get(idx).map(Window::pane)
    }

    #[must_use]
    pub fn basic_window(&self, id: PaneId) -> Option<&BasicWindow> {
        let (space, idx) = self.locate(id)?;
        match space.windows.get(idx)? {
            Window::Basic(window) => Some(window),
            Window::Plain(_) => None,
        }
    }

    /// Run `f` against a basic window and collect whatever it emitted.
    pub fn with_basic_window<R>(
        &mut self,
        id: PaneId,
        f: impl FnOnce(&mut BasicWindow) -> R,
    ) -> Option<R> {
        let (space, idx) = self.locate_mut(id)?;
        let out = match space.windows.get_mut(idx)? {
            Window::Basic(window) => f(window),
            Window::Plain(_) => return None,
        };
        self.collect_events();
        Some(out)
    }

    /// Panes of the active space in render order, bottom first. Staged panes
    /// are excluded.
    #[must_use]
    pub fn canvas(&self) -> Vec<&Pane> {
        let Some(space) = self.spaces.get(self.active) else {
            return Vec::new();
        };
        let mut panes: Vec<&Pane> = space
            .windows
            .iter()
            .map(Window::pane)
            .filter(|p| !p.is_staged())
            .collect();
        panes.sort_by_key(|p| p.effective_z_index());
        panes
    }

    /// Staged panes of the active space in opening order.
    #[must_use]
    pub fn tray(&self) -> Vec<&Pane> {
        self.spaces
            .get(self.active)
            .map(|space| {
                space
                    .windows
                    .iter()
                    .map(Window::pane)
                    .filter(|p| p.is_staged())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the active space's tray should be drawn right now.
    #[must_use]
    pub fn tray_visible(&self) -> bool {
        self.active_zone()
            .is_some_and(|z| z.tray_visible(self.stage.pointer()))
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Process one raw pointer event. Returns whether a gesture consumed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(input) = self.stage.handle_pointer(event) else {
            return false;
        };
        let frame = self.stage.frame();
        let Some(space) = self.spaces.get_mut(self.active) else {
            return false;
        };
        let consumed = match input.kind {
            PointerEventKind::Down => space.pointer_down(&frame, input.pointer),
            PointerEventKind::Move => space.pointer_moved(&frame, input.pointer),
            PointerEventKind::Up => space.pointer_up(&frame),
        };
        space.settle(&frame);
        if consumed && input.kind == PointerEventKind::Move {
            self.stage.set_wheel_busy(true);
        }
        trace!(kind = ?input.kind, x = input.pointer.x, y = input.pointer.y, consumed, "pointer tick");
        self.collect_events();
        consumed
    }

    /// Record where the stage sits on screen.
    pub fn observe_stage_rect(&mut self, rect: Rect, intersecting: bool) -> bool {
        self.stage.observe_rect(rect, intersecting)
    }

    /// Resize the stage and compensate every pane in every space.
    ///
    /// Returns how many panes were moved.
    pub fn resize_stage(&mut self, size: Size) -> usize {
        let previous = self.stage.resize(size);
        if previous == size {
            return 0;
        }
        self.pull_panes_onto_stage(|pane, cx| pane.stage_resized(cx, previous))
    }

    /// Change the stage scale, pulling back panes whose scaled extent now
    /// overflows. Returns the number of panes moved.
    pub fn set_stage_scale(&mut self, scale: Scale) -> usize {
        if self.stage.scale() == scale {
            return 0;
        }
        self.stage.set_scale(scale);
        let moved = self.pull_panes_onto_stage(Pane::stage_rescaled);
        debug!(scale_x = scale.x(), scale_y = scale.y(), moved, "stage rescaled");
        moved
    }

    fn pull_panes_onto_stage(
        &mut self,
        mut pull: impl FnMut(&mut Pane, &mut PaneContext<'_>) -> bool,
    ) -> usize {
        let frame = self.stage.frame();
        let mut moved = 0;
        for space in &mut self.spaces {
            for window in &mut space.windows {
                if pull(window.pane_mut(), &mut PaneContext::new(&frame, &mut space.zone)) {
                    moved += 1;
                }
            }
            space.settle(&frame);
        }
        self.collect_events();
        moved
    }

    /// Stage button for `id`.
    pub fn set_staged(&mut self, id: PaneId, staged: bool) -> bool {
        self.with_pane(id, |pane, cx| pane.set_staged(cx, staged))
            .unwrap_or(false)
    }

    /// Click on a tray thumbnail.
    pub fn restore_from_tray(&mut self, id: PaneId) -> bool {
        self.with_pane(id, |pane, cx| pane.restore_from_tray(cx))
            .unwrap_or(false)
    }

    pub fn focus(&mut self, id: PaneId) -> bool {
        self.with_pane(id, |pane, cx| {
            pane.focus(cx);
            true
        })
        .unwrap_or(false)
    }

    pub fn set_always_on_top(&mut self, id: PaneId, always_on_top: bool) -> bool {
        self.with_pane(id, |pane, cx| {
            pane.set_always_on_top(cx, always_on_top);
            true
        })
        .unwrap_or(false)
    }

    fn with_pane<R>(
        &mut self,
        id: PaneId,
        f: impl FnOnce(&mut Pane, &mut PaneContext<'_>) -> R,
    ) -> Option<R> {
        let frame = self.stage.frame();
        let (space, idx) = self.locate_mut(id)?;
        let window = space.windows.get_mut(idx)?;
        let out = f(
            window.pane_mut(),
            &mut PaneContext::new(&frame, &mut space.zone),
        );
        space.settle(&frame);
        self.collect_events();
        Some(out)
    }

    fn collect_events(&mut self) {
        for space in &mut self.spaces {
            space.drain_into(&mut self.events);
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<DeskEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_core::stage::StageOptions;

    fn desk(width: f64, height: f64) -> Desk {
        Desk::new(DeskConfig {
            stage: StageOptions {
                size: Size::new(width, height),
                ..StageOptions::default()
            },
            spaces: 2,
            ..DeskConfig::default()
        })
        .unwrap()
    }

    fn at(x: f64, y: f64, w: f64, h: f64) -> PaneOptions {
        PaneOptions {
            position: Point::new(x, y),
            size: Size::new(w, h),
            ..PaneOptions::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Desk::new(DeskConfig {
            spaces: 0,
            ..DeskConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn space_navigation_is_clamped() {
        let mut desk = desk(800.0, 600.0);
        assert_eq!(desk.previous_space(), 0);
        assert_eq!(desk.next_space(), 1);
        assert_eq!(desk.next_space(), 1);
        assert_eq!(desk.previous_space(), 0);
        assert_eq!(
            desk.select_space(4),
            Err(DeskError::UnknownSpace { index: 4, count: 2 })
        );
        let third = desk.add_space();
        assert_eq!(third, ZoneId::new(3));
        desk.select_space(2).unwrap();
        assert_eq!(desk.active_zone().map(Zone::id), Some(third));
    }

    #[test]
    fn panes_open_in_active_space() {
        let mut desk = desk(800.0, 600.0);
        let a = desk.open_pane(at(0.0, 0.0, 200.0, 200.0)).unwrap();
        desk.next_space();
        let b = desk.open_pane(at(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert!(desk.zone(ZoneId::new(1)).is_some_and(|z| z.window(a).is_some()));
        assert!(desk.zone(ZoneId::new(2)).is_some_and(|z| z.window(b).is_some()));
        assert_eq!(desk.canvas().len(), 1);
    }

    #[test]
    fn invalid_options_do_not_mount() {
        let mut desk = desk(800.0, 600.0);
        let err = desk.open_pane(at(0.0, 0.0, -1.0, 10.0)).unwrap_err();
        assert!(matches!(err, DeskError::Options(_)));
        assert!(desk.canvas().is_empty());
    }

    #[test]
    fn content_click_focuses_and_blurs_previous() {
        let mut desk = desk(1200.0, 800.0);
        let a = desk.open_pane(at(0.0, 0.0, 200.0, 200.0)).unwrap();
        let b = desk.open_pane(at(600.0, 0.0, 200.0, 200.0)).unwrap();
        desk.drain_events();
        assert!(desk.handle_pointer(PointerEvent::down(100.0, 100.0)));
        desk.handle_pointer(PointerEvent::up(100.0, 100.0));
        let events = desk.drain_events();
        assert!(events.contains(&DeskEvent {
            space: ZoneId::new(1),
            pane: a,
            kind: DeskEventKind::Pane {
                event: PaneEvent::Focused
            },
        }));
        assert!(events.contains(&DeskEvent {
            space: ZoneId::new(1),
            pane: b,
            kind: DeskEventKind::Pane {
                event: PaneEvent::Blurred
            },
        }));
        assert_eq!(desk.canvas().last().map(|p| p.id()), Some(a));
    }

    #[test]
    fn basic_window_events_reach_outbox() {
        let mut desk = desk(1200.0, 800.0);
        let id = desk.open_basic_window(BasicWindowOptions::default()).unwrap();
        assert_eq!(desk.pane(id).map(Pane::position), Some(Point::new(20.0, 20.0)));
        desk.drain_events();
        desk.with_basic_window(id, |w| w.set_title("Inbox"));
        assert_eq!(
            desk.drain_events(),
            vec![DeskEvent {
                space: ZoneId::new(1),
                pane: id,
                kind: DeskEventKind::Window {
                    event: BasicWindowEvent::TitleChanged {
                        title: "Inbox".into()
                    }
                },
            }]
        );
        assert_eq!(desk.basic_window(id).map(BasicWindow::title), Some("Inbox"));
    }

    #[test]
    fn multi_touch_move_is_ignored() {
        let mut desk = desk(800.0, 600.0);
        assert!(!desk.handle_pointer(PointerEvent::moved(10.0, 10.0).with_touches(2)));
    }
}
