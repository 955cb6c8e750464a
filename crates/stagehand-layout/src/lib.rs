#![forbid(unsafe_code)]

//! Zones and panes: the window layer of Stagehand.
//!
//! # Role in Stagehand
//! A [`Zone`] is one window-hosting region of the stage. It keeps a registry
//! of every mounted [`Pane`], finds horizontal neighbours as panes move,
//! finalizes magnetic snaps when a gesture ends and drives synchronized drags
//! of snapped pairs. Panes own their own drag, resize and staging state and
//! talk to the zone only through the [`ZoneLink`] capability.
//!
//! # How it fits in the system
//! Geometry and coordinate spaces come from `stagehand-core`. The
//! `stagehand-runtime` crate owns stages, zones and panes together and routes
//! pointer input through them one tick at a time.

pub mod basic;
pub mod dispatch;
pub mod id;
pub mod pane;
pub mod registry;
pub mod resize;
pub mod snap;
pub mod zone;

pub use basic::{
    AUTO_PLACEMENT_OFFSET, BasicWindow, BasicWindowEvent, BasicWindowOptions, InitialPosition,
};
pub use dispatch::{ZoneDispatcher, ZoneEvent, ZoneEventKind};
pub use id::{PaneId, PaneIdAllocator, PaneIdError, ZoneId};
pub use pane::{
    BoundsChangeReason, Pane, PaneContext, PaneDock, PaneEvent, PaneGesture, PaneHit, PaneOptions,
    PaneOptionsError, RenderTarget, SNAP_MOVING_Z_BONUS, StagedBy, StagedLayout, StagedSize,
    StagingPreview,
};
pub use registry::{BoundsReport, ClockPosition, WindowRecord, WindowRegistry};
pub use resize::{
    ParseGripError, RESIZER_DEFAULT_THRESHOLD, ResizeGrip, ResizeOrigin, classify_resize_grip,
    resize_bounds,
};
pub use snap::{
    ParseSnapWithError, Snap, SnapKey, SnapOrientation, SnapSet, SnapWith, Snapping, ToSnap,
};
pub use zone::{
    ALWAYS_ON_TOP_Z_INDEX, SNAP_MOVER_HEIGHT, SnapGestureKind, TRAY_REVEAL_DISTANCE, Zone,
    ZONE_Z_INDEX_START, ZoneConfig, ZoneLink,
};
