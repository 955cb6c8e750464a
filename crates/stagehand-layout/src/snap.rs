#![forbid(unsafe_code)]

//! Snap relationships between pairs of windows.
//!
//! A [`Snapping`] is a provisional candidate found while a gesture is in
//! flight. When the gesture ends with a valid candidate the zone promotes it
//! to a finalized [`Snap`] and stores it in its [`SnapSet`].
//!
//! # Invariants
//!
//! - A snap always references exactly two distinct windows.
//! - The set holds at most one snap per unordered window pair.
//! - Candidate equality is order-sensitive: `left`/`right` must match.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Size};

use crate::id::PaneId;

/// Axis along which two windows are glued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapOrientation {
    /// Side by side; the shared edge is vertical.
    #[default]
    Horizontal,
    /// Stacked. Reserved; the zone never produces it.
    Vertical,
}

/// Unordered pair of window ids used to key snaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapKey {
    low: PaneId,
    high: PaneId,
}

impl SnapKey {
    /// Build a key from two ids in any order.
    #[must_use]
    pub fn new(a: PaneId, b: PaneId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    #[must_use]
    pub const fn ids(self) -> [PaneId; 2] {
        [self.low, self.high]
    }

    #[must_use]
    pub fn contains(self, id: PaneId) -> bool {
        self.low == id || self.high == id
    }

    /// The other member of the pair, if `id` is a member.
    #[must_use]
    pub fn partner_of(self, id: PaneId) -> Option<PaneId> {
        if self.low == id {
            Some(self.high)
        } else if self.high == id {
            Some(self.low)
        } else {
            None
        }
    }
}

/// Provisional snap candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Snapping {
    pub orientation: SnapOrientation,
    /// Window whose gesture produced the candidate.
    pub interacted: PaneId,
    pub left: PaneId,
    pub right: PaneId,
}

impl Snapping {
    #[must_use]
    pub const fn horizontal(interacted: PaneId, left: PaneId, right: PaneId) -> Self {
        Self {
            orientation: SnapOrientation::Horizontal,
            interacted,
            left,
            right,
        }
    }

    /// The unordered pair this candidate relates.
    #[must_use]
    pub fn key(&self) -> SnapKey {
        SnapKey::new(self.left, self.right)
    }

    #[must_use]
    pub fn involves(&self, id: PaneId) -> bool {
        self.left == id || self.right == id
    }

    #[must_use]
    pub fn partner_of(&self, id: PaneId) -> Option<PaneId> {
        self.key().partner_of(id)
    }
}

impl PartialEq for Snapping {
    fn eq(&self, other: &Self) -> bool {
        self.orientation == other.orientation && self.left == other.left && self.right == other.right
    }
}

impl Eq for Snapping {}

/// Finalized snap between two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snap {
    pub orientation: SnapOrientation,
    pub interacted: PaneId,
    pub left: PaneId,
    pub right: PaneId,
    /// Both windows are being dragged together through the snap handle.
    pub snap_moving: bool,
    /// The shared edge is being dragged.
    pub snap_resizing: bool,
    pub z_index: u64,
}

impl Snap {
    #[must_use]
    pub fn key(&self) -> SnapKey {
        SnapKey::new(self.left, self.right)
    }

    #[must_use]
    pub fn involves(&self, id: PaneId) -> bool {
        self.left == id || self.right == id
    }

    /// A synchronized gesture currently holds this snap.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.snap_moving || self.snap_resizing
    }
}

impl From<Snapping> for Snap {
    fn from(candidate: Snapping) -> Self {
        Self {
            orientation: candidate.orientation,
            interacted: candidate.interacted,
            left: candidate.left,
            right: candidate.right,
            snap_moving: false,
            snap_resizing: false,
            z_index: 0,
        }
    }
}

/// Finalized snaps keyed by unordered window pair.
#[derive(Debug, Clone, Default)]
pub struct SnapSet {
    snaps: BTreeMap<SnapKey, Snap>,
}

impl SnapSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a snap, replacing any snap for the same pair.
    ///
    /// Returns `true` if the pair was not present before.
    pub fn insert(&mut self, snap: Snap) -> bool {
        self.snaps.insert(snap.key(), snap).is_none()
    }

    #[must_use]
    pub fn get(&self, key: SnapKey) -> Option<&Snap> {
        self.snaps.get(&key)
    }

    pub fn get_mut(&mut self, key: SnapKey) -> Option<&mut Snap> {
        self.snaps.get_mut(&key)
    }

    pub fn remove(&mut self, key: SnapKey) -> Option<Snap> {
        self.snaps.remove(&key)
    }

    /// Remove every snap referencing `id`, returning how many were dropped.
    pub fn remove_involving(&mut self, id: PaneId) -> usize {
        let before = self.snaps.len();
        self.snaps.retain(|key, _| !key.contains(id));
        before - self.snaps.len()
    }

    /// Keys of snaps referencing `id`, in key order.
    #[must_use]
    pub fn keys_involving(&self, id: PaneId) -> Vec<SnapKey> {
        self.snaps.keys().copied().filter(|k| k.contains(id)).collect()
    }

    pub fn involving(&self, id: PaneId) -> impl Iterator<Item = &Snap> {
        self.snaps.values().filter(move |s| s.involves(id))
    }

    pub fn involving_mut(&mut self, id: PaneId) -> impl Iterator<Item = &mut Snap> {
        self.snaps.values_mut().filter(move |s| s.involves(id))
    }

    /// Whether a synchronized gesture holds a snap referencing `id`.
    #[must_use]
    pub fn is_held(&self, id: PaneId) -> bool {
        self.involving(id).any(Snap::is_held)
    }

    pub fn clear(&mut self) {
        self.snaps.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snaps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snaps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snap> {
        self.snaps.values()
    }
}

/// Instruction telling one pane where to go to sit flush against its partner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToSnap {
    pub target: PaneId,
    /// `[left, right]`.
    pub windows: [PaneId; 2],
    pub position: Point,
    pub size: Size,
}

impl ToSnap {
    /// The window the target was snapped against.
    #[must_use]
    pub fn partner(&self) -> Option<PaneId> {
        SnapKey::new(self.windows[0], self.windows[1]).partner_of(self.target)
    }

    #[must_use]
    pub fn involves(&self, id: PaneId) -> bool {
        self.windows.contains(&id)
    }
}

/// Which gestures are allowed to produce snaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapWith {
    #[default]
    All,
    Move,
    Resize,
}

impl SnapWith {
    /// Whether an in-flight update may build a candidate.
    #[must_use]
    pub const fn permits_update(self, moving: bool, resizing: bool) -> bool {
        match self {
            Self::All => moving || resizing,
            Self::Move => moving,
            Self::Resize => resizing,
        }
    }

    /// Whether a gesture that just ended may finalize a candidate.
    #[must_use]
    pub const fn permits_end(self, moving: bool, resizing: bool) -> bool {
        match self {
            Self::All => !moving && !resizing,
            Self::Move => !moving,
            Self::Resize => !resizing,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Move => "move",
            Self::Resize => "resize",
        }
    }
}

impl FromStr for SnapWith {
    type Err = ParseSnapWithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "move" => Ok(Self::Move),
            "resize" => Ok(Self::Resize),
            other => Err(ParseSnapWithError(other.to_string())),
        }
    }
}

/// Unknown `snap_with` policy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSnapWithError(pub String);

impl fmt::Display for ParseSnapWithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown snap policy {:?} (expected all, move or resize)", self.0)
    }
}

impl std::error::Error for ParseSnapWithError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> PaneId {
        PaneId::new(raw).expect("test id must be non-zero")
    }

    fn snap(left: u64, right: u64) -> Snap {
        Snap::from(Snapping::horizontal(id(left), id(left), id(right)))
    }

    #[test]
    fn key_is_unordered() {
        assert_eq!(SnapKey::new(id(1), id(2)), SnapKey::new(id(2), id(1)));
        let key = SnapKey::new(id(4), id(3));
        assert_eq!(key.ids(), [id(3), id(4)]);
        assert_eq!(key.partner_of(id(3)), Some(id(4)));
        assert_eq!(key.partner_of(id(9)), None);
    }

    #[test]
    fn snapping_equality_is_order_sensitive() {
        let a = Snapping::horizontal(id(1), id(1), id(2));
        let b = Snapping::horizontal(id(2), id(1), id(2));
        let c = Snapping::horizontal(id(1), id(2), id(1));
        assert_eq!(a, b, "interacted window does not affect equality");
        assert_ne!(a, c);
        assert_eq!(a.key(), c.key());
    }

    #[test]
    fn insert_is_idempotent_per_pair() {
        let mut set = SnapSet::new();
        assert!(set.insert(snap(1, 2)));
        assert!(!set.insert(snap(2, 1)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(SnapKey::new(id(1), id(2))).map(|s| s.left), Some(id(2)));
    }

    #[test]
    fn remove_involving_purges_all_pairs() {
        let mut set = SnapSet::new();
        set.insert(snap(1, 2));
        set.insert(snap(2, 3));
        set.insert(snap(4, 5));
        assert_eq!(set.remove_involving(id(2)), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.involving(id(2)).count(), 0);
    }

    #[test]
    fn held_reflects_gesture_flags() {
        let mut set = SnapSet::new();
        set.insert(snap(1, 2));
        assert!(!set.is_held(id(1)));
        if let Some(s) = set.get_mut(SnapKey::new(id(1), id(2))) {
            s.snap_resizing = true;
        }
        assert!(set.is_held(id(1)));
        assert!(set.is_held(id(2)));
        assert!(!set.is_held(id(3)));
    }

    #[test]
    fn policy_tables() {
        assert!(SnapWith::All.permits_update(true, false));
        assert!(SnapWith::All.permits_update(false, true));
        assert!(!SnapWith::All.permits_update(false, false));
        assert!(!SnapWith::Move.permits_update(false, true));
        assert!(SnapWith::Resize.permits_update(false, true));

        assert!(SnapWith::All.permits_end(false, false));
        assert!(!SnapWith::All.permits_end(false, true));
        assert!(SnapWith::Move.permits_end(false, true));
        assert!(!SnapWith::Resize.permits_end(false, true));
    }

    #[test]
    fn snap_with_parses_and_serializes() {
        assert_eq!("move".parse::<SnapWith>(), Ok(SnapWith::Move));
        assert!("diagonal".parse::<SnapWith>().is_err());
        assert_eq!(serde_json::to_string(&SnapWith::Resize).unwrap(), "\"resize\"");
        assert_eq!(SnapWith::All.as_str(), "all");
    }

    #[test]
    fn to_snap_partner() {
        let ts = ToSnap {
            target: id(2),
            windows: [id(1), id(2)],
            position: Point::ZERO,
            size: Size::ZERO,
        };
        assert_eq!(ts.partner(), Some(id(1)));
        assert!(ts.involves(id(1)));
        assert!(!ts.involves(id(3)));
    }
}
