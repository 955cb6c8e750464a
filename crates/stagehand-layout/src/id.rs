#![forbid(unsafe_code)]

//! Opaque pane and zone identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a pane.
///
/// `0` is reserved/invalid so IDs are always non-zero. IDs are handed out by
/// a [`PaneIdAllocator`] and never reused for the lifetime of that allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    /// Lowest valid pane ID.
    pub const MIN: Self = Self(1);

    /// Create a new pane ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, PaneIdError> {
        if raw == 0 {
            return Err(PaneIdError::Zero);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, PaneIdError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(PaneIdError::Overflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// Identifier of one zone within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u32);

impl ZoneId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Monotonic pane ID source.
#[derive(Debug, Clone)]
pub struct PaneIdAllocator {
    next: Option<PaneId>,
}

impl PaneIdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: Some(PaneId::MIN),
        }
    }

    /// Hand out the next unused ID.
    pub fn allocate(&mut self) -> Result<PaneId, PaneIdError> {
        let Some(current) = self.next else {
            return Err(PaneIdError::Exhausted);
        };
        self.next = current.checked_next().ok();
        Ok(current)
    }
}

impl Default for PaneIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pane identifier failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneIdError {
    Zero,
    Overflow { current: PaneId },
    Exhausted,
}

impl fmt::Display for PaneIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "pane id 0 is invalid"),
            Self::Overflow { current } => write!(f, "pane id overflow after {}", current.0),
            Self::Exhausted => write!(f, "pane id space exhausted"),
        }
    }
}

impl std::error::Error for PaneIdError {}
