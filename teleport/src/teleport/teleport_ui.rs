use cgmath::Vector3;

use super::{RevealScheduler, TeleportHit};
use crate::config::TeleportVisualConfig;

/// Which of the three aiming states the hit indicator is in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimIndicator {
    /// Aiming, nothing valid under the path
    Searching,
    /// Valid hit, reveal still running; releasing now cancels
    Targeting,
    /// Valid hit and reveal complete; releasing now teleports
    Confirmed,
}

impl AimIndicator {
    pub fn from_state(has_hit: bool, reveal_complete: bool) -> Self {
        match (has_hit, reveal_complete) {
            (false, _) => AimIndicator::Searching,
            (true, false) => AimIndicator::Targeting,
            (true, true) => AimIndicator::Confirmed,
        }
    }
}

/// Landing marker: inner cylinder + torus, plus an outer torus that shrinks in as the
/// reveal completes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitMarker {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
    pub cylinder_radius: f32,
    pub cylinder_height: f32,
    pub inner_opacity: f32,
    pub outer_torus_radius: f32,
}

/// Everything the visual sink needs for one frame. The path is lent from the
/// system's display buffer and is only valid until the next update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportVisuals<'a> {
    pub visible: bool,
    /// Displayed path; empty when idle or when the aim direction is degenerate
    pub path: &'a [Vector3<f32>],
    pub line_color: Vector3<f32>,
    pub line_opacity: f32,
    pub line_width: f32,
    pub indicator: Option<AimIndicator>,
    pub hit_marker: Option<HitMarker>,
}

impl TeleportVisuals<'static> {
    pub fn hidden() -> Self {
        TeleportVisuals {
            visible: false,
            path: &[],
            line_color: Vector3::new(0.0, 0.0, 0.0),
            line_opacity: 0.0,
            line_width: 0.0,
            indicator: None,
            hit_marker: None,
        }
    }
}

/// Slow in the middle, fast at both ends
pub fn ease_out_in(t: f32) -> f32 {
    let u = 2.0 * t - 1.0;
    if t < 0.5 {
        0.5 * (u * u * u + 1.0)
    } else {
        0.5 * u * u * u + 0.5
    }
}

pub struct TeleportUI;

impl TeleportUI {
    pub fn build_visuals<'a>(
        path: &'a [Vector3<f32>],
        hit: Option<&TeleportHit>,
        reveal: &RevealScheduler,
        style: &TeleportVisualConfig,
    ) -> TeleportVisuals<'a> {
        let indicator = AimIndicator::from_state(hit.is_some(), reveal.is_complete());
        let confirmed = indicator == AimIndicator::Confirmed;

        let line_color = if hit.is_some() {
            style.curve_hit_color
        } else {
            style.curve_miss_color
        };
        let line_opacity = if confirmed {
            style.hit_opacity
        } else {
            style.miss_opacity
        };

        let hit_marker = hit.map(|hit| Self::hit_marker(hit.point, reveal.fraction(), style));

        TeleportVisuals {
            visible: true,
            path,
            line_color,
            line_opacity,
            line_width: style.curve_line_width,
            indicator: Some(indicator),
            hit_marker,
        }
    }

    fn hit_marker(position: Vector3<f32>, reveal_fraction: f32, style: &TeleportVisualConfig) -> HitMarker {
        let eased = ease_out_in(reveal_fraction);
        HitMarker {
            position,
            color: style.hit_cylinder_color,
            cylinder_radius: style.hit_cylinder_radius,
            cylinder_height: style.hit_cylinder_height,
            inner_opacity: style.hit_opacity * eased,
            outer_torus_radius: style.hit_cylinder_radius * (style.hit_outer_torus_scale - eased),
        }
    }
}
