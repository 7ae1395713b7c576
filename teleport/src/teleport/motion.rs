use cgmath::{Vector3, vec3};

/// Vertical launch speed below which the flight span falls back to the configured maximum
pub const FLAT_LAUNCH_EPSILON: f32 = 1e-4;

/// Position at time `t` of a point with constant acceleration: `p0 + v0·t + ½·a·t²` per axis.
///
/// Pure; callers are responsible for passing a non-negative, monotonic `t`.
pub fn evaluate(
    origin: Vector3<f32>,
    initial_velocity: Vector3<f32>,
    acceleration: Vector3<f32>,
    t: f32,
) -> Vector3<f32> {
    let t_squared = t * t;
    vec3(
        axis(origin.x, initial_velocity.x, acceleration.x, t, t_squared),
        axis(origin.y, initial_velocity.y, acceleration.y, t, t_squared),
        axis(origin.z, initial_velocity.z, acceleration.z, t, t_squared),
    )
}

fn axis(p0: f32, v0: f32, a: f32, t: f32, t_squared: f32) -> f32 {
    p0 + v0 * t + 0.5 * a * t_squared
}

/// Motion of the aimed point for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParameters {
    pub origin: Vector3<f32>,
    pub initial_velocity: Vector3<f32>,
    pub acceleration: Vector3<f32>,
}

impl MotionParameters {
    /// Arc launched along `direction` at `speed`, falling under `gravity` on Y.
    pub fn ballistic(origin: Vector3<f32>, direction: Vector3<f32>, speed: f32, gravity: f32) -> Self {
        MotionParameters {
            origin,
            initial_velocity: direction * speed,
            acceleration: vec3(0.0, gravity, 0.0),
        }
    }

    /// Straight ray whose parameter `t` is the fraction of `max_length` travelled.
    pub fn linear(origin: Vector3<f32>, direction: Vector3<f32>, max_length: f32) -> Self {
        MotionParameters {
            origin,
            initial_velocity: direction * max_length,
            acceleration: vec3(0.0, 0.0, 0.0),
        }
    }

    pub fn position_at(&self, t: f32) -> Vector3<f32> {
        evaluate(self.origin, self.initial_velocity, self.acceleration, t)
    }

    /// Time span to simulate for a ballistic path.
    ///
    /// The estimate is the time to rise and fall back to launch height, `|v0.y / (½·a.y)|`,
    /// clamped to `[min_span, max_span]`. A flat launch, zero gravity or a non-finite
    /// estimate uses `max_span`.
    pub fn flight_span(&self, min_span: f32, max_span: f32) -> f32 {
        let vy = self.initial_velocity.y;
        let half_ay = 0.5 * self.acceleration.y;

        if vy.abs() < FLAT_LAUNCH_EPSILON || half_ay == 0.0 {
            return max_span;
        }

        let estimate = (vy / half_ay).abs();
        if !estimate.is_finite() {
            return max_span;
        }
        estimate.clamp(min_span, max_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_evaluate_kinematics() {
        let p = evaluate(vec3(1.0, 2.0, 3.0), vec3(1.0, 4.0, -2.0), vec3(0.0, -10.0, 0.0), 0.5);
        assert!((p - vec3(1.5, 2.75, 2.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_evaluate_at_zero_is_origin() {
        let origin = vec3(-3.0, 1.6, 8.0);
        assert_eq!(evaluate(origin, vec3(5.0, 5.0, 5.0), vec3(0.0, -9.8, 0.0), 0.0), origin);
    }

    #[test]
    fn test_descent_is_monotonic_after_apex() {
        let direction = vec3(0.0, 1.0, -1.0).normalize();
        let motion = MotionParameters::ballistic(vec3(0.0, 1.6, 0.0), direction, 5.0, -9.8);
        let apex = -motion.initial_velocity.y / motion.acceleration.y;
        assert!(apex > 0.0);

        let mut previous_y = motion.position_at(apex).y;
        for step in 1..200 {
            let t = apex + step as f32 * 0.01;
            let y = motion.position_at(t).y;
            assert!(y <= previous_y, "y rose after apex at t={}", t);
            previous_y = y;
        }
    }

    #[test]
    fn test_linear_motion_spans_max_length() {
        let motion = MotionParameters::linear(vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, -1.0), 10.0);
        assert_eq!(motion.position_at(1.0), vec3(0.0, 1.0, -10.0));
        assert_eq!(motion.position_at(0.25), vec3(0.0, 1.0, -2.5));
    }

    #[test]
    fn test_flight_span_bounds() {
        let flat = MotionParameters::ballistic(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0), 5.0, -9.8);
        assert_eq!(flat.flight_span(1.0, 4.0), 4.0);

        // 45 degrees up at 10 m/s: 2·vy/g ≈ 1.443s
        let lofted = MotionParameters::ballistic(
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, -1.0).normalize(),
            10.0,
            -9.8,
        );
        let span = lofted.flight_span(1.0, 4.0);
        assert!((span - 1.443).abs() < 1e-3);

        // A short hop is clamped up to the minimum
        let hop = MotionParameters::ballistic(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, -1.0).normalize(), 1.0, -9.8);
        assert_eq!(hop.flight_span(1.0, 4.0), 1.0);

        let weightless = MotionParameters::ballistic(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), 3.0, 0.0);
        assert_eq!(weightless.flight_span(1.0, 4.0), 4.0);
    }
}
