#![forbid(unsafe_code)]

//! Global tracing subscriber setup.
//!
//! Library crates only emit `tracing` events; embedders that want them on
//! stderr call [`init`] once at startup. The filter uses `EnvFilter` syntax
//! (`"stagehand_layout=debug,info"`). With the `tracing-json` feature every
//! line is written as a JSON object.

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV: &str = "STAGEHAND_LOG";

/// Install the global subscriber with an explicit filter directive.
pub fn init(filter: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(filter).map_err(LoggingError::Filter)?;
    install(filter)
}

/// Install the global subscriber using [`LOG_ENV`], falling back to `warn`.
pub fn init_from_env() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    install(filter)
}

#[cfg(not(feature = "tracing-json"))]
fn install(filter: EnvFilter) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(feature = "tracing-json")]
fn install(filter: EnvFilter) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

/// Logging setup failures.
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directive did not parse.
    Filter(ParseError),
    /// A global subscriber was already installed.
    Install(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "invalid log filter: {e}"),
            Self::Install(e) => write!(f, "failed to install subscriber: {e}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Install(_) => None,
        }
    }
}
