#![forbid(unsafe_code)]

//! Stack configuration.
//!
//! [`StackConfig`] gathers the constants a host sets once: window capacity,
//! layout margins, the action threshold, animation timings and drag tuning.
//! With the `config-file` feature it can be loaded from TOML or JSON.
//!
//! ```toml
//! # cardstack.toml
//! max_simultaneous_cards = 4
//! default_offset = 30.0
//! action_trigger_threshold = 0.3
//!
//! [drag]
//! rotation_factor = 0.2
//! ```
//!
//! Every field has a default, so a partial file only overrides what it names.

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use cardstack_core::drag::DragTuning;
use cardstack_core::offsets::OffsetPolicy;

/// Tunable constants for a [`StackController`](crate::controller::StackController).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct StackConfig {
    /// Cards kept materialized at once (default: 3).
    pub max_simultaneous_cards: usize,
    /// Base margin of the top card (default: 15.0).
    pub default_offset: f64,
    /// Margin increment per depth (default: 5.0).
    pub index_offset: f64,
    /// Fraction of card width a drag must travel to dismiss (default: 0.25).
    pub action_trigger_threshold: f64,
    /// Duration of the fly-off animation, in milliseconds (default: 300).
    pub dismiss_duration_ms: u64,
    /// Duration of the snap-back animation, in milliseconds (default: 300).
    pub snap_back_duration_ms: u64,
    /// Duration of the animated layout pass after an eviction (default: 300).
    pub layout_duration_ms: u64,
    /// Drag rendering constants.
    pub drag: DragTuning,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_simultaneous_cards: 3,
            default_offset: 15.0,
            index_offset: 5.0,
            action_trigger_threshold: 0.25,
            dismiss_duration_ms: 300,
            snap_back_duration_ms: 300,
            layout_duration_ms: 300,
            drag: DragTuning::default(),
        }
    }
}

impl StackConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, StackConfigError> {
        toml::from_str(s).map_err(StackConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StackConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StackConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, StackConfigError> {
        serde_json::from_str(s).map_err(StackConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StackConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StackConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is in range.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_simultaneous_cards == 0 {
            errors.push("max_simultaneous_cards must be at least 1".to_string());
        }
        if !(self.default_offset.is_finite() && self.default_offset >= 0.0) {
            errors.push(format!(
                "default_offset must be finite and non-negative, got {}",
                self.default_offset
            ));
        }
        if !(self.index_offset.is_finite() && self.index_offset >= 0.0) {
            errors.push(format!(
                "index_offset must be finite and non-negative, got {}",
                self.index_offset
            ));
        }
        if !(0.0..=1.0).contains(&self.action_trigger_threshold) {
            errors.push(format!(
                "action_trigger_threshold must be in [0, 1], got {}",
                self.action_trigger_threshold
            ));
        }
        if !(self.drag.exit_distance.is_finite() && self.drag.exit_distance > 0.0) {
            errors.push(format!(
                "drag.exit_distance must be positive, got {}",
                self.drag.exit_distance
            ));
        }
        if !(self.drag.alpha_gain.is_finite() && self.drag.alpha_gain > 0.0) {
            errors.push(format!(
                "drag.alpha_gain must be positive, got {}",
                self.drag.alpha_gain
            ));
        }
        if !self.drag.rotation_factor.is_finite() {
            errors.push("drag.rotation_factor must be finite".to_string());
        }

        errors
    }

    /// Validate, turning problems into an error.
    pub fn validated(self) -> Result<Self, StackConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(StackConfigError::Validation(errors))
        }
    }

    /// Layout offset policy derived from the margins.
    #[must_use]
    pub fn offset_policy(&self) -> OffsetPolicy {
        OffsetPolicy::new(self.default_offset, self.index_offset)
    }

    #[must_use]
    pub fn dismiss_duration(&self) -> Duration {
        Duration::from_millis(self.dismiss_duration_ms)
    }

    #[must_use]
    pub fn snap_back_duration(&self) -> Duration {
        Duration::from_millis(self.snap_back_duration_ms)
    }

    #[must_use]
    pub fn layout_duration(&self) -> Duration {
        Duration::from_millis(self.layout_duration_ms)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when building or loading a configuration.
#[derive(Debug)]
pub enum StackConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for StackConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for StackConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
