use cgmath::{Deg, InnerSpace, Quaternion, Rad, Vector3, vec3};

/// Squared length below which a vector is treated as having no direction
pub const DIRECTION_EPSILON: f32 = 1e-12;

/// Normalize `v`, or `None` if it is (nearly) zero-length.
pub fn try_normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let magnitude2 = v.magnitude2();
    if !magnitude2.is_finite() || magnitude2 < DIRECTION_EPSILON {
        return None;
    }
    Some(v / magnitude2.sqrt())
}

/// Angle between two vectors in degrees, in [0, 180].
///
/// The cosine is clamped so that identical directions give exactly 0 rather than NaN.
pub fn angle_between_degrees(a: Vector3<f32>, b: Vector3<f32>) -> Option<f32> {
    let denominator = (a.magnitude2() * b.magnitude2()).sqrt();
    if !denominator.is_finite() || denominator < DIRECTION_EPSILON {
        return None;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    Some(Deg::from(Rad(cos.acos())).0)
}

/// World-space forward (-Z) for an object with the given rotation
pub fn forward_from_rotation(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation * vec3(0.0, 0.0, -1.0)
}
