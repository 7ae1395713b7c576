use cgmath::{Quaternion, Vector3};
use rapier3d::{na::UnitQuaternion, prelude::*};

pub fn nvec_to_cgmath(vec: Vector<Real>) -> Vector3<f32> {
    Vector3 {
        x: vec.x,
        y: vec.y,
        z: vec.z,
    }
}

pub fn npoint_to_cgvec(point: Point<Real>) -> Vector3<f32> {
    Vector3 {
        x: point.x,
        y: point.y,
        z: point.z,
    }
}

pub fn vec_to_npoint(vec: Vector3<f32>) -> Point<Real> {
    point![vec.x, vec.y, vec.z]
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn quat_to_nquat(rotation: Quaternion<f32>) -> UnitQuaternion<f32> {
    let nquat = rapier3d::na::Quaternion::new(rotation.s, rotation.v.x, rotation.v.y, rotation.v.z);
    UnitQuaternion::from_quaternion(nquat)
}

/// Rigid placement for a collider from cgmath translation + rotation
pub fn isometry(translation: Vector3<f32>, rotation: Quaternion<f32>) -> Isometry<Real> {
    Isometry::from_parts(vec_to_nvec(translation).into(), quat_to_nquat(rotation))
}
