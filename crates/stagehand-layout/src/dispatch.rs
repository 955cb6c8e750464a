#![forbid(unsafe_code)]

//! Zone-scoped event queue used for synchronized snap gestures.
//!
//! When the shared edge of a snap is dragged, the zone enqueues one
//! [`ZoneEvent`] per affected window. The host drains the queue in order and
//! hands each event to its target pane. Events carry the zone id so a pane
//! hosted elsewhere can never act on them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::Point;

use crate::id::{PaneId, ZoneId};

/// What a snapped window should do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ZoneEventKind {
    MoveStart,
    MoveEnd,
    /// Translate by a stage-pixel delta.
    Move { delta: Point },
    /// Grow or shrink by an unscaled delta.
    Resize { delta: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneEvent {
    pub zone: ZoneId,
    pub target: PaneId,
    pub kind: ZoneEventKind,
}

/// FIFO of pending events for one zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneDispatcher {
    zone: ZoneId,
    queue: VecDeque<ZoneEvent>,
}

impl ZoneDispatcher {
    #[must_use]
    pub fn new(zone: ZoneId) -> Self {
        Self {
            zone,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn dispatch(&mut self, target: PaneId, kind: ZoneEventKind) {
        self.queue.push_back(ZoneEvent {
            zone: self.zone,
            target,
            kind,
        });
    }

    /// Take every pending event in dispatch order.
    pub fn drain(&mut self) -> Vec<ZoneEvent> {
        self.queue.drain(..).collect()
    }

    /// Drop pending events addressed to `id`.
    pub fn forget(&mut self, id: PaneId) {
        self.queue.retain(|e| e.target != id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
