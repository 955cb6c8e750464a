#![forbid(unsafe_code)]

//! Core: geometry, coordinate spaces, pointer input and observable state.
//!
//! # Role in Stagehand
//! `stagehand-core` is the bottom layer. It owns the [`stage::Stage`], the
//! root coordinate frame every zone and pane is positioned in, and the
//! shared pointer/button state those layers read while a gesture is active.
//!
//! # How it fits in the system
//! `stagehand-layout` builds zones and panes on top of the
//! [`scale::CoordinateSpace`] capability exported here, and
//! `stagehand-runtime` feeds raw [`event::PointerEvent`]s into the stage.

pub mod event;
pub mod geometry;
pub mod reactive;
pub mod scale;
pub mod stage;

pub use event::{PointerEvent, PointerEventKind, PointerSource};
pub use geometry::{Point, Rect, Size};
pub use reactive::{Observable, Subscription};
pub use scale::{CoordinateSpace, Scale, ScaleError, StageFrame};
pub use stage::{Stage, StageInput, StageOptions};
