//! Timeline settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::controller::WheelSettings;
use crate::model::{TimeUnit, UnitThresholds, ZoomBounds};

const SETTINGS_FILENAME: &str = "settings.json";

/// User-tunable timeline behaviour. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    /// Smallest visible span, in seconds.
    pub min_zoom_secs: i64,
    /// Largest visible span, in seconds.
    pub max_zoom_secs: i64,
    pub hour_min_px: f64,
    pub day_min_px: f64,
    pub default_unit: TimeUnit,
    pub wheel_divisor: f64,
    pub fast_wheel_multiplier: f64,
    /// Span shown when a dataset has neither a window nor items.
    pub initial_span_days: i64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            min_zoom_secs: 60 * 60,
            max_zoom_secs: 365 * 86_400,
            hour_min_px: 40.0,
            day_min_px: 30.0,
            default_unit: TimeUnit::Day,
            wheel_divisor: 500.0,
            fast_wheel_multiplier: 4.0,
            initial_span_days: 30,
        }
    }
}

impl TimelineOptions {
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: TimeDelta::seconds(self.min_zoom_secs),
            max: TimeDelta::seconds(self.max_zoom_secs),
        }
    }

    pub fn unit_thresholds(&self) -> UnitThresholds {
        UnitThresholds {
            hour_min_px: self.hour_min_px,
            day_min_px: self.day_min_px,
            fallback: self.default_unit,
        }
    }

    pub fn wheel_settings(&self) -> WheelSettings {
        WheelSettings {
            divisor: self.wheel_divisor,
            fast_multiplier: self.fast_wheel_multiplier,
        }
    }

    pub fn initial_span(&self) -> TimeDelta {
        TimeDelta::days(self.initial_span_days)
    }

    /// Replace out-of-range values with their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.min_zoom_secs <= 0
            || self.max_zoom_secs <= 0
            || self.min_zoom_secs > self.max_zoom_secs
            // TimeDelta::seconds panics past i64::MAX milliseconds
            || self.max_zoom_secs > i64::MAX / 1000
        {
            log::warn!(
                "invalid zoom bounds {}s..{}s, using defaults",
                self.min_zoom_secs,
                self.max_zoom_secs
            );
            self.min_zoom_secs = defaults.min_zoom_secs;
            self.max_zoom_secs = defaults.max_zoom_secs;
        }
        if !(self.hour_min_px.is_finite() && self.hour_min_px > 0.0) {
            log::warn!("invalid hour_min_px {}, using default", self.hour_min_px);
            self.hour_min_px = defaults.hour_min_px;
        }
        if !(self.day_min_px.is_finite() && self.day_min_px > 0.0) {
            log::warn!("invalid day_min_px {}, using default", self.day_min_px);
            self.day_min_px = defaults.day_min_px;
        }
        if !(self.wheel_divisor.is_finite() && self.wheel_divisor > 0.0) {
            log::warn!("invalid wheel_divisor {}, using default", self.wheel_divisor);
            self.wheel_divisor = defaults.wheel_divisor;
        }
        if !(self.fast_wheel_multiplier.is_finite() && self.fast_wheel_multiplier > 0.0) {
            self.fast_wheel_multiplier = defaults.fast_wheel_multiplier;
        }
        if self.initial_span_days <= 0 || self.initial_span_days > 100_000 {
            self.initial_span_days = defaults.initial_span_days;
        }
        self
    }

    /// Default settings location, e.g. `~/.config/RustTimelineApp/settings.json`.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "RustTimelineApp")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
            .unwrap_or_else(|| PathBuf::from(".").join(SETTINGS_FILENAME))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| AppError::from_io(path, e))?;
        let options: Self = serde_json::from_str(&json).map_err(|e| AppError::SettingsLoadError {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(options.validated())
    }

    /// Load settings, falling back to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(options) => {
                log::info!("loaded settings from {}", path.display());
                options
            }
            Err(AppError::FileNotFound { .. }) => {
                log::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::SettingsSaveError {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| AppError::SettingsSaveError {
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| AppError::SettingsSaveError {
            reason: format!("{}: {}", path.display(), e),
        })
    }
}
