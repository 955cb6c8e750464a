#![forbid(unsafe_code)]

//! Stagehand public facade crate.
//!
//! Re-exports the types most embedders need from the core, layout and
//! runtime crates, plus a single [`Error`] covering all of them.
//!
//! ```rust,ignore
//! use stagehand::prelude::*;
//!
//! let mut desk = Desk::new(DeskConfig::from_toml_file("stagehand.toml")?)?;
//! let notes = desk.open_basic_window(BasicWindowOptions::default())?;
//! desk.handle_pointer(PointerEvent::down(40.0, 30.0));
//! for event in desk.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use stagehand_core::{
    CoordinateSpace, Observable, Point, PointerEvent, PointerEventKind, PointerSource, Rect,
    Scale, ScaleError, Size, Stage, StageFrame, StageInput, StageOptions, Subscription,
};

// --- Layout re-exports -----------------------------------------------------

pub use stagehand_layout::{
    BasicWindow, BasicWindowEvent, BasicWindowOptions, BoundsChangeReason, InitialPosition, Pane,
    PaneDock, PaneEvent, PaneGesture, PaneHit, PaneId, PaneIdError, PaneOptions, PaneOptionsError,
    RenderTarget, ResizeGrip, Snap, SnapWith, StagedBy, StagedLayout, StagedSize, StagingPreview,
    Zone, ZoneConfig, ZoneId,
};

// --- Runtime re-exports ----------------------------------------------------

pub use stagehand_runtime::{
    ConfigError, Desk, DeskConfig, DeskError, DeskEvent, DeskEventKind, LoggingError, logging,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Stagehand embedders.
#[derive(Debug)]
pub enum Error {
    Scale(ScaleError),
    PaneId(PaneIdError),
    PaneOptions(PaneOptionsError),
    Config(ConfigError),
    Desk(DeskError),
    Logging(LoggingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale(err) => write!(f, "{err}"),
            Self::PaneId(err) => write!(f, "{err}"),
            Self::PaneOptions(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Desk(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scale(err) => Some(err),
            Self::PaneId(err) => Some(err),
            Self::PaneOptions(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Desk(err) => Some(err),
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<ScaleError> for Error {
    fn from(err: ScaleError) -> Self {
        Self::Scale(err)
    }
}

impl From<PaneIdError> for Error {
    fn from(err: PaneIdError) -> Self {
        Self::PaneId(err)
    }
}

impl From<PaneOptionsError> for Error {
    fn from(err: PaneOptionsError) -> Self {
        Self::PaneOptions(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DeskError> for Error {
    fn from(err: DeskError) -> Self {
        Self::Desk(err)
    }
}

impl From<LoggingError> for Error {
    fn from(err: LoggingError) -> Self {
        Self::Logging(err)
    }
}

/// Standard result type for Stagehand APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BasicWindowOptions, Desk, DeskConfig, DeskEvent, DeskEventKind, Error, PaneEvent, PaneId,
        PaneOptions, Point, PointerEvent, Rect, Result, Scale, Size,
    };

    pub use crate::{core, layout, runtime};
}

pub use stagehand_core as core;
pub use stagehand_layout as layout;
pub use stagehand_runtime as runtime;
