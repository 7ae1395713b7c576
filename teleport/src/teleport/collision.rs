use cgmath::{InnerSpace, Vector3};

use super::surface::{GroundPlane, SurfaceHit, TeleportSurface, nearest_hit};
use crate::config::TeleportConfig;
use crate::math::{angle_between_degrees, try_normalize};

/// First valid landing found along a sampled path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Index `i` of the segment `(points[i - 1], points[i])` containing the hit; always >= 1
    pub segment_index: usize,
    /// How far along that segment the hit lies, in [0, 1]
    pub segment_fraction: f32,
}

/// Walks a sampled path segment by segment looking for the first surface that is
/// flat enough to stand on.
pub struct CollisionResolver {
    landing_normal: Vector3<f32>,
    landing_max_angle: f32,
    default_plane: GroundPlane,
}

impl CollisionResolver {
    pub fn new(landing_normal: Vector3<f32>, landing_max_angle: f32, default_plane: GroundPlane) -> Self {
        CollisionResolver {
            landing_normal,
            landing_max_angle,
            default_plane,
        }
    }

    pub fn from_config(config: &TeleportConfig) -> Self {
        Self::new(
            config.landing_normal,
            config.landing_max_angle,
            GroundPlane::new(config.default_plane_size),
        )
    }

    /// A surface is walkable when its normal is within `landing_max_angle` degrees of the
    /// landing normal. Degenerate normals are never walkable.
    pub fn is_valid_landing(&self, surface_normal: Vector3<f32>) -> bool {
        angle_between_degrees(surface_normal, self.landing_normal)
            .is_some_and(|angle| angle <= self.landing_max_angle)
    }

    /// Find the first valid hit along `points`, scanning segments near to far.
    ///
    /// Each segment reports its nearest front-facing intersection; if that surface is too
    /// steep the scan moves on to the next segment rather than giving up. When `surfaces`
    /// holds no geometry the default ground plane is used instead.
    pub fn resolve(
        &self,
        points: &[Vector3<f32>],
        surfaces: &[&dyn TeleportSurface],
    ) -> Option<TeleportHit> {
        for i in 1..points.len() {
            let Some(hit) = self.cast_segment(points[i - 1], points[i], surfaces) else {
                continue;
            };

            if !self.is_valid_landing(hit.normal) {
                crate::collision_log!(
                    TRACE,
                    "segment {} hit surface with normal {:?}, steeper than {} degrees",
                    i,
                    hit.normal,
                    self.landing_max_angle
                );
                continue;
            }

            let segment_length = (points[i] - points[i - 1]).magnitude();
            let segment_fraction = if segment_length > 0.0 {
                (hit.distance / segment_length).clamp(0.0, 1.0)
            } else {
                0.0
            };

            return Some(TeleportHit {
                point: hit.point,
                normal: hit.normal,
                segment_index: i,
                segment_fraction,
            });
        }

        None
    }

    /// Nearest raw intersection between `start` and `end`, whatever its orientation.
    pub fn cast_segment(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        surfaces: &[&dyn TeleportSurface],
    ) -> Option<SurfaceHit> {
        let delta = end - start;
        let length = delta.magnitude();
        let direction = try_normalize(delta)?;

        if surfaces.iter().all(|surface| surface.is_empty()) {
            self.default_plane.cast_ray(start, direction, length)
        } else {
            nearest_hit(surfaces.iter().copied(), start, direction, length)
        }
    }
}
