#![forbid(unsafe_code)]

//! Desk configuration loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # stagehand.toml
//! spaces = 2
//!
//! [stage]
//! size = { width = 1280.0, height = 800.0 }
//! scale = [1.0, 1.0]
//!
//! [zone]
//! snap_threshold = 40.0
//! snap_with = "move"
//!
//! [pane]
//! staging_distance = 120.0
//! ```
//!
//! ```rust,ignore
//! let config = DeskConfig::from_toml_file("stagehand.toml")?;
//! let config = DeskConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every section defaults to the values the individual components use, so a
//! missing file section behaves exactly like `DeskConfig::default()`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stagehand_core::stage::StageOptions;
use stagehand_layout::pane::PaneOptions;
use stagehand_layout::zone::ZoneConfig;

/// Top-level configuration for a [`crate::Desk`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Stage size and scale.
    pub stage: StageOptions,

    /// Snapping and tray behaviour shared by every space.
    pub zone: ZoneConfig,

    /// Base options for panes opened without explicit options.
    pub pane: PaneOptions,

    /// Number of spaces created up front.
    pub spaces: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            stage: StageOptions::default(),
            zone: ZoneConfig::default(),
            pane: PaneOptions::default(),
            spaces: 1,
        }
    }
}

impl DeskConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let size = self.stage.size;
        if !size.width.is_finite() || size.width < 0.0 {
            errors.push(format!("stage.size.width must be >= 0, got {}", size.width));
        }
        if !size.height.is_finite() || size.height < 0.0 {
            errors.push(format!(
                "stage.size.height must be >= 0, got {}",
                size.height
            ));
        }

        errors.extend(self.zone.validate());

        if let Err(e) = self.pane.validate() {
            errors.push(e.to_string());
        }

        if self.spaces == 0 {
            errors.push("spaces must be >= 1".to_string());
        }

        errors
    }

    /// Validate, turning a non-empty error list into [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`DeskConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
