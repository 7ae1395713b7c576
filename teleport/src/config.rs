use std::path::Path;

use cgmath::{Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TeleportError};
use crate::input::TeleportButton;

/// Shape of the aimed path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Ballistic arc under `gravity`
    Parabolic,
    /// Straight ray of `max_length`
    Line,
}

/// Colours, sizes and opacities handed to the visual sink
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportVisualConfig {
    pub curve_line_width: f32,
    pub curve_hit_color: Vector3<f32>,
    pub curve_miss_color: Vector3<f32>,
    pub hit_cylinder_color: Vector3<f32>,
    pub hit_cylinder_radius: f32,
    pub hit_cylinder_height: f32,
    pub hit_outer_torus_scale: f32,
    pub miss_opacity: f32,
    pub hit_opacity: f32,
}

impl Default for TeleportVisualConfig {
    fn default() -> Self {
        TeleportVisualConfig {
            curve_line_width: 0.025,
            curve_hit_color: vec3(0.6, 1.0, 0.6),
            curve_miss_color: vec3(1.0, 0.0, 0.0),
            hit_cylinder_color: vec3(0.6, 1.0, 0.6),
            hit_cylinder_radius: 0.25,
            hit_cylinder_height: 0.3,
            hit_outer_torus_scale: 2.5,
            miss_opacity: 0.1,
            hit_opacity: 0.3,
        }
    }
}

/// Configuration for the teleport system
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub curve_type: CurveType,
    pub button: TeleportButton,
    /// Event names that start aiming; used instead of `button` when `end_events` is also set
    pub start_events: Vec<String>,
    pub end_events: Vec<String>,
    /// Minimum time between collision re-checks
    pub interval_ms: f64,
    /// Range of the straight-line path
    pub max_length: f32,
    pub curve_number_points: usize,
    pub curve_shooting_speed: f32,
    /// Vertical acceleration of the ballistic path
    pub gravity: f32,
    /// Lower bound on the simulated time span of the ballistic path
    pub min_flight_time_s: f32,
    /// Upper bound on the simulated time span, and the span used when the launch is flat
    pub max_flight_time_s: f32,
    /// Edge length of the fallback ground plane
    pub default_plane_size: f32,
    pub landing_normal: Vector3<f32>,
    pub landing_max_angle: f32,
    pub draw_incrementally: bool,
    pub incremental_draw_ms: f32,
    pub visual: TeleportVisualConfig,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        TeleportConfig {
            curve_type: CurveType::Parabolic,
            button: TeleportButton::Trackpad,
            start_events: Vec::new(),
            end_events: Vec::new(),
            interval_ms: 0.0,
            max_length: 10.0,
            curve_number_points: 30,
            curve_shooting_speed: 5.0,
            gravity: -9.8,
            min_flight_time_s: 1.0,
            max_flight_time_s: 4.0,
            default_plane_size: 100.0,
            landing_normal: vec3(0.0, 1.0, 0.0),
            landing_max_angle: 45.0,
            draw_incrementally: false,
            incremental_draw_ms: 700.0,
            visual: TeleportVisualConfig::default(),
        }
    }
}

impl TeleportConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TeleportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TeleportError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Check every numeric option against its bounds.
    pub fn validate(&self) -> Result<()> {
        if self.curve_number_points < 2 {
            return Err(TeleportError::validation(
                "curve_number_points",
                format!("must be at least 2, got {}", self.curve_number_points),
            ));
        }
        if !(self.interval_ms >= 0.0) {
            return Err(TeleportError::validation("interval_ms", "must be >= 0"));
        }
        if !(self.max_length >= 0.0) || !self.max_length.is_finite() {
            return Err(TeleportError::validation("max_length", "must be a finite value >= 0"));
        }
        if !(self.curve_shooting_speed >= 0.0) || !self.curve_shooting_speed.is_finite() {
            return Err(TeleportError::validation(
                "curve_shooting_speed",
                "must be a finite value >= 0",
            ));
        }
        if !self.gravity.is_finite() {
            return Err(TeleportError::validation("gravity", "must be finite"));
        }
        if !(self.min_flight_time_s > 0.0) {
            return Err(TeleportError::validation("min_flight_time_s", "must be > 0"));
        }
        if !(self.max_flight_time_s >= self.min_flight_time_s) || !self.max_flight_time_s.is_finite() {
            return Err(TeleportError::validation(
                "max_flight_time_s",
                "must be finite and >= min_flight_time_s",
            ));
        }
        if !(self.default_plane_size > 0.0) {
            return Err(TeleportError::validation("default_plane_size", "must be > 0"));
        }
        if crate::math::try_normalize(self.landing_normal).is_none() {
            return Err(TeleportError::validation("landing_normal", "must be a non-zero vector"));
        }
        if !(0.0..=360.0).contains(&self.landing_max_angle) {
            return Err(TeleportError::validation(
                "landing_max_angle",
                format!("must be within [0, 360], got {}", self.landing_max_angle),
            ));
        }
        if !(self.incremental_draw_ms >= 0.0) {
            return Err(TeleportError::validation("incremental_draw_ms", "must be >= 0"));
        }

        let visual = &self.visual;
        if !(visual.hit_cylinder_radius >= 0.0) || !(visual.hit_cylinder_height >= 0.0) {
            return Err(TeleportError::validation("visual.hit_cylinder", "radius and height must be >= 0"));
        }
        if !(visual.hit_outer_torus_scale >= 0.25) {
            return Err(TeleportError::validation("visual.hit_outer_torus_scale", "must be >= 0.25"));
        }
        for (field, opacity) in [
            ("visual.miss_opacity", visual.miss_opacity),
            ("visual.hit_opacity", visual.hit_opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(TeleportError::validation(field, "must be within [0, 1]"));
            }
        }

        Ok(())
    }

    /// Number of points in the sample buffer for the configured curve type
    pub fn sample_count(&self) -> usize {
        match self.curve_type {
            CurveType::Parabolic => self.curve_number_points,
            CurveType::Line => 2,
        }
    }
}
