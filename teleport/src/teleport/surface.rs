use cgmath::{InnerSpace, Vector3};
use rapier3d::parry::shape::Shape;
use rapier3d::prelude::*;

use crate::physics::util::{npoint_to_cgvec, nvec_to_cgmath, vec_to_npoint, vec_to_nvec};

/// Half-thickness of the fallback ground slab; its top face sits exactly on y = 0
const GROUND_HALF_THICKNESS: f32 = 0.01;

/// Nearest intersection of a ray with a surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Distance from the ray origin along the (unit) direction
    pub distance: f32,
}

/// Anything the teleport arc can land on.
///
/// Implementations only read their geometry; the teleport core never owns or mutates them.
pub trait TeleportSurface {
    /// Cast a ray along unit `direction`, returning the nearest front-facing hit within
    /// `max_distance`. Geometry enclosing `origin` is not reported.
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<SurfaceHit>;

    /// True when there is no geometry to cast against at all; a path whose surfaces are
    /// all empty falls back to the default ground plane.
    fn is_empty(&self) -> bool {
        false
    }
}

fn cast_against(
    shape: &dyn Shape,
    position: &Isometry<Real>,
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<SurfaceHit> {
    let start = vec_to_npoint(origin);
    // A segment starting inside a blocker only sees its exit face
    if shape.contains_point(position, &start) {
        return None;
    }

    let ray = Ray::new(start, vec_to_nvec(direction));
    let intersection = shape.cast_ray_and_get_normal(position, &ray, max_distance, false)?;
    let normal = nvec_to_cgmath(intersection.normal);
    if normal.dot(direction) >= 0.0 {
        return None;
    }

    Some(SurfaceHit {
        point: npoint_to_cgvec(ray.point_at(intersection.time_of_impact)),
        normal,
        distance: intersection.time_of_impact,
    })
}

impl TeleportSurface for Collider {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<SurfaceHit> {
        cast_against(self.shape(), self.position(), origin, direction, max_distance)
    }
}

/// Every collider in the set is a candidate; the nearest hit wins.
impl TeleportSurface for ColliderSet {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<SurfaceHit> {
        nearest_hit(self.iter().map(|(_, collider)| collider), origin, direction, max_distance)
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Nearest hit across several surfaces
pub fn nearest_hit<'a, S, I>(
    surfaces: I,
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<SurfaceHit>
where
    S: TeleportSurface + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    surfaces
        .into_iter()
        .filter_map(|surface| surface.cast_ray(origin, direction, max_distance))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Square, flat ground centred on the origin with its walkable face on y = 0.
///
/// Stands in for the scene when no collidable surfaces are supplied.
pub struct GroundPlane {
    collider: Collider,
}

impl GroundPlane {
    pub fn new(size: f32) -> Self {
        let half_extent = size * 0.5;
        let collider = ColliderBuilder::cuboid(half_extent, GROUND_HALF_THICKNESS, half_extent)
            .translation(vector![0.0, -GROUND_HALF_THICKNESS, 0.0])
            .build();
        GroundPlane { collider }
    }
}

impl TeleportSurface for GroundPlane {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<SurfaceHit> {
        TeleportSurface::cast_ray(&self.collider, origin, direction, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, vec3};

    #[test]
    fn test_ground_plane_hit_from_above() {
        let ground = GroundPlane::new(100.0);
        let hit = ground
            .cast_ray(vec3(2.0, 1.5, -3.0), vec3(0.0, -1.0, 0.0), 10.0)
            .unwrap();

        assert!(hit.point.y.abs() < 1e-5);
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert!((hit.normal - vec3(0.0, 1.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_ground_plane_respects_range_and_extent() {
        let ground = GroundPlane::new(10.0);
        assert!(ground.cast_ray(vec3(0.0, 1.5, 0.0), vec3(0.0, -1.0, 0.0), 1.0).is_none());
        assert!(ground.cast_ray(vec3(20.0, 1.5, 0.0), vec3(0.0, -1.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_collider_set_returns_nearest() {
        let mut colliders = ColliderSet::new();
        colliders.insert(
            ColliderBuilder::cuboid(5.0, 0.5, 5.0)
                .translation(vector![0.0, -0.5, 0.0])
                .build(),
        );
        colliders.insert(
            ColliderBuilder::cuboid(1.0, 0.5, 1.0)
                .translation(vector![0.0, 0.5, 0.0])
                .build(),
        );

        let hit = TeleportSurface::cast_ray(&colliders, vec3(0.0, 5.0, 0.0), vec3(0.0, -1.0, 0.0), 10.0)
            .unwrap();
        assert!((hit.point.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_starting_inside_a_collider_ignores_it() {
        let block = ColliderBuilder::cuboid(1.0, 1.0, 1.0).build();

        let from_inside =
            TeleportSurface::cast_ray(&block, vec3(0.0, 0.5, 0.0), vec3(0.0, 0.0, -1.0), 10.0);
        assert!(from_inside.is_none());

        let from_outside =
            TeleportSurface::cast_ray(&block, vec3(0.0, 0.5, 3.0), vec3(0.0, 0.0, -1.0), 10.0)
                .unwrap();
        assert!((from_outside.distance - 2.0).abs() < 1e-5);
        assert!((from_outside.normal - vec3(0.0, 0.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_empty_collider_set_reports_empty() {
        let mut colliders = ColliderSet::new();
        assert!(TeleportSurface::is_empty(&colliders));
        assert!(!TeleportSurface::is_empty(&GroundPlane::new(10.0)));

        colliders.insert(ColliderBuilder::ball(0.5).build());
        assert!(!TeleportSurface::is_empty(&colliders));
    }
}
