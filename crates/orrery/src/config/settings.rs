use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::camera::Easing;

/// Global knobs, read once at construction.
///
/// Only `animation_enabled`, `time_scale`, and the viewport (see `Orrery::resize`)
/// change afterwards, through explicit setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Two clicks on the same body closer than this are a double click.
    pub double_click_ms: f64,
    /// Quiet time after the last user camera input before auto-follow resumes.
    pub user_idle_timeout_ms: f64,
    /// Length of a scripted focus/reset transition.
    pub transition_duration_ms: f64,
    pub transition_easing: Easing,
    /// Slow trailing factor while following (per 60 Hz frame, 0 = snap).
    pub follow_smoothing: f64,
    /// Fast factor used to re-centre after the user lets go.
    pub recenter_smoothing: f64,
    /// Re-centring ends within this fraction of the follow distance.
    pub recenter_tolerance: f64,
    /// Screen-fill ratio for bodies that don't specify one.
    pub default_framing_ratio: f64,
    /// Diagonal offset of the follow camera, as a fraction of its distance.
    pub framing_bias: f64,
    pub fov_y_deg: f64,
    /// Extra room around the whole system in the overview framing.
    pub overview_margin: f64,
    /// Overview camera elevation above the ecliptic.
    pub overview_elevation_deg: f64,
    /// Simulated days per real second. Negative runs the clock backwards.
    pub time_scale: f64,
    pub animation_enabled: bool,
    /// Per-tick `dt` clamp (seconds).
    pub max_frame_dt: f64,
    pub max_hierarchy_depth: usize,
    /// Seed for initial phases of bodies that don't specify one.
    pub seed: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Capacity of the per-tick event section of the frame buffer.
    pub max_events: usize,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 300.0,
            user_idle_timeout_ms: 5000.0,
            transition_duration_ms: 1500.0,
            transition_easing: Easing::CubicInOut,
            follow_smoothing: 0.92,
            recenter_smoothing: 0.75,
            recenter_tolerance: 0.01,
            default_framing_ratio: 0.35,
            framing_bias: 0.2,
            fov_y_deg: 45.0,
            overview_margin: 1.15,
            overview_elevation_deg: 35.0,
            time_scale: 10.0,
            animation_enabled: true,
            max_frame_dt: 0.25,
            max_hierarchy_depth: 4,
            seed: 0x5EED_0B17,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_events: 32,
        }
    }
}

impl OrreryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("double_click_ms", self.double_click_ms)?;
        positive("user_idle_timeout_ms", self.user_idle_timeout_ms)?;
        positive("transition_duration_ms", self.transition_duration_ms)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("overview_margin", self.overview_margin)?;
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;

        unit_interval("follow_smoothing", self.follow_smoothing)?;
        unit_interval("recenter_smoothing", self.recenter_smoothing)?;

        finite("recenter_tolerance", self.recenter_tolerance)?;
        finite("framing_bias", self.framing_bias)?;
        finite("overview_elevation_deg", self.overview_elevation_deg)?;
        finite("time_scale", self.time_scale)?;
        if self.recenter_tolerance <= 0.0 {
            return Err(invalid("recenter_tolerance", "must be positive"));
        }

        if !(self.fov_y_deg > 0.0 && self.fov_y_deg < 180.0) {
            return Err(invalid("fov_y_deg", format!("{} is not in (0, 180)", self.fov_y_deg)));
        }
        if !(self.default_framing_ratio > 0.0 && self.default_framing_ratio <= 1.0) {
            return Err(invalid(
                "default_framing_ratio",
                format!("{} is not in (0, 1]", self.default_framing_ratio),
            ));
        }
        if self.max_hierarchy_depth == 0 {
            return Err(invalid("max_hierarchy_depth", "must be at least 1"));
        }
        Ok(())
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f64 {
        self.fov_y_deg.to_radians()
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting { name, reason: reason.into() }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, "must be finite"))
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("{value} must be positive")))
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, format!("{value} is not in [0, 1)")))
    }
}
