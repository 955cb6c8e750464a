#![forbid(unsafe_code)]

//! Zone-owned window records.
//!
//! Each mounted pane has exactly one [`WindowRecord`] in its zone's
//! [`WindowRegistry`]. Records are keyed by [`PaneId`]; the registry is the
//! only place the zone reads geometry from when searching for neighbours.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Rect, Size};
use stagehand_core::scale::CoordinateSpace;

use crate::id::PaneId;

/// Side on which a candidate neighbour sits relative to the window being
/// interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPosition {
    /// Neighbour's right edge meets this window's left edge.
    Left,
    /// Neighbour's left edge meets this window's right edge.
    Right,
}

impl ClockPosition {
    /// Numeric form: `0` for a neighbour on the left, `1` on the right.
    #[must_use]
    pub const fn as_index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Geometry and interaction flags a pane reports to its zone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundsReport {
    /// Stage-pixel position.
    pub position: Point,
    /// Unscaled pane size.
    pub size: Size,
    pub moving: bool,
    pub resizing: bool,
    pub staged: bool,
    /// Narrowest unscaled width the pane accepts.
    #[serde(default)]
    pub min_width: f64,
    /// Widest unscaled width the pane accepts, if bounded.
    #[serde(default)]
    pub max_width: Option<f64>,
}

impl BoundsReport {
    #[must_use]
    pub const fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            moving: false,
            resizing: false,
            staged: false,
            min_width: 0.0,
            max_width: None,
        }
    }

    #[must_use]
    pub const fn width_limits(mut self, min: f64, max: Option<f64>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    #[must_use]
    pub const fn moving(mut self, moving: bool) -> Self {
        self.moving = moving;
        self
    }

    #[must_use]
    pub const fn resizing(mut self, resizing: bool) -> Self {
        self.resizing = resizing;
        self
    }

    #[must_use]
    pub const fn staged(mut self, staged: bool) -> Self {
        self.staged = staged;
        self
    }
}

/// One window as the zone sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: PaneId,
    pub position: Point,
    pub size: Size,
    pub moving: bool,
    pub resizing: bool,
    pub staged: bool,
    pub min_width: f64,
    pub max_width: Option<f64>,
    /// Transient adjacency marker, valid only for the latest bounds update.
    pub clock_position: Option<ClockPosition>,
}

impl WindowRecord {
    #[must_use]
    pub fn from_report(id: PaneId, report: BoundsReport) -> Self {
        Self {
            id,
            position: report.position,
            size: report.size,
            moving: report.moving,
            resizing: report.resizing,
            staged: report.staged,
            min_width: report.min_width,
            max_width: report.max_width,
            clock_position: None,
        }
    }

    /// Signed width changes this window accepts, as `(shrink, grow)` bounds.
    #[must_use]
    pub fn width_slack(&self) -> (f64, f64) {
        let grow = self
            .max_width
            .map_or(f64::INFINITY, |max| (max - self.size.width).max(0.0));
        let shrink = (self.min_width - self.size.width).min(0.0);
        (shrink, grow)
    }

    /// Bounds in stage pixels.
    #[must_use]
    pub fn stage_rect(&self, space: &dyn CoordinateSpace) -> Rect {
        Rect::from_parts(self.position, space.scale_size(self.size))
    }

    /// Stage-pixel x of the right edge.
    #[must_use]
    pub fn right_edge(&self, space: &dyn CoordinateSpace) -> f64 {
        self.position.x + space.scale_x(self.size.width)
    }

    /// Stage-pixel y of the bottom edge.
    #[must_use]
    pub fn bottom_edge(&self, space: &dyn CoordinateSpace) -> f64 {
        self.position.y + space.scale_y(self.size.height)
    }
}

/// Map from pane id to its record.
#[derive(Debug, Clone, Default)]
pub struct WindowRegistry {
    windows: FxHashMap<PaneId, WindowRecord>,
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for `id`. The clock marker is reset.
    pub fn upsert(&mut self, id: PaneId, report: BoundsReport) -> &mut WindowRecord {
        let record = WindowRecord::from_report(id, report);
        match self.windows.entry(id) {
            Entry::Occupied(slot) => {
                let slot = slot.into_mut();
                *slot = record;
                slot
            }
            Entry::Vacant(slot) => slot.insert(record),
        }
    }

    #[must_use]
    pub fn get(&self, id: PaneId) -> Option<&WindowRecord> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: PaneId) -> Option<&mut WindowRecord> {
        self.windows.get_mut(&id)
    }

    pub fn remove(&mut self, id: PaneId) -> Option<WindowRecord> {
        self.windows.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: PaneId) -> bool {
        self.windows.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Records in ascending id order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&WindowRecord> {
        let mut records: Vec<_> = self.windows.values().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowRecord> {
        self.windows.values_mut()
    }
}
