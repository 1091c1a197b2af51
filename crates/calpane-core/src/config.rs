#![forbid(unsafe_code)]

//! Tunable thresholds for the panel gesture engine.
//!
//! [`GestureConfig::default()`] carries the production constants. With the
//! `config-file` feature the same struct loads from TOML or JSON; missing
//! keys keep their defaults.
//!
//! ```toml
//! # calpane.toml
//! dead_zone = 10.0
//! expanded_height = 280.0
//! header_height = 56.0
//! default_mode = "expanded"
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::height::PanelMode;

/// Thresholds, durations and fixed heights used by every engine component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct GestureConfig {
    /// Displacement (px) a drag must exceed on either axis before it is classified.
    pub dead_zone: f64,
    /// `|dx|` must exceed `|dy| * horizontal_ratio` to lock horizontal.
    pub horizontal_ratio: f64,
    /// The nested list counts as "at top" when its scroll offset is at most this.
    pub scroll_top_tolerance: f64,
    /// Vertical release displacement (px) beyond which a resize steps one state.
    pub flick_threshold: f64,
    /// Horizontal release displacement (px) needed to change month.
    pub min_swipe_distance: f64,
    /// Delay between a swipe decision and the navigation callback.
    pub commit_window_ms: u64,
    /// Duration of the post-release height transition.
    pub settle_duration_ms: u64,
    /// Canonical height of the expanded panel.
    pub expanded_height: f64,
    /// Height of the fixed page header above the panel.
    pub header_height: f64,
    /// Sibling bottom-nav height used when the host cannot measure it.
    pub fallback_nav_height: f64,
    /// Release displacement (px) under which an unlocked session counts as a tap.
    pub tap_slop: f64,
    /// Mode the panel starts in.
    pub default_mode: PanelMode,
    /// Year view: the year grid owns taps inside the content region.
    pub year_view: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dead_zone: 10.0,
            horizontal_ratio: 1.5,
            scroll_top_tolerance: 2.0,
            flick_threshold: 50.0,
            min_swipe_distance: 50.0,
            commit_window_ms: 200,
            settle_duration_ms: 300,
            expanded_height: 280.0,
            header_height: 0.0,
            fallback_nav_height: 80.0,
            tap_slop: 10.0,
            default_mode: PanelMode::Collapsed,
            year_view: false,
        }
    }
}

impl GestureConfig {
    /// Commit window as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn commit_window(&self) -> Duration {
        Duration::from_millis(self.commit_window_ms)
    }

    /// Settle transition as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Check every parameter. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let non_negative = [
            ("dead_zone", self.dead_zone),
            ("scroll_top_tolerance", self.scroll_top_tolerance),
            ("flick_threshold", self.flick_threshold),
            ("min_swipe_distance", self.min_swipe_distance),
            ("header_height", self.header_height),
            ("fallback_nav_height", self.fallback_nav_height),
            ("tap_slop", self.tap_slop),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if !self.horizontal_ratio.is_finite() || self.horizontal_ratio < 1.0 {
            errors.push(format!(
                "horizontal_ratio must be >= 1, got {}",
                self.horizontal_ratio
            ));
        }

        if !self.expanded_height.is_finite() || self.expanded_height <= 0.0 {
            errors.push(format!(
                "expanded_height must be > 0, got {}",
                self.expanded_height
            ));
        }

        errors
    }

    /// `Ok(self)` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`GestureConfig`].
#[derive(Debug)]
pub enum ConfigError {
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

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
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
