#![forbid(unsafe_code)]

//! Runtime: the desk host loop, configuration and logging setup.
//!
//! # Role in Stagehand
//! [`Desk`] owns one [`stagehand_core::Stage`] and a list of spaces. It turns
//! raw pointer events into pane and snap gestures for the active space and
//! collects every resulting [`DeskEvent`] into a single outbox.
//!
//! # How it fits in the system
//! Configuration is loaded with [`DeskConfig`] from TOML or JSON. Embedders
//! that want log output call [`logging::init`] once at startup; the library
//! crates only emit `tracing` events.

pub mod config;
pub mod desk;
pub mod logging;

pub use config::{ConfigError, DeskConfig};
pub use desk::{Desk, DeskError, DeskEvent, DeskEventKind};
pub use logging::{LOG_ENV, LoggingError};
