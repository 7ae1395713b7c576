use cgmath::{InnerSpace, Vector3, vec3};

use super::motion::MotionParameters;

/// Sampled points along the prospective teleport path.
///
/// The buffer keeps its allocation across frames and is only resized when the point
/// count changes. Point values are scratch data: they are overwritten by the next
/// `sample` call, so copy out anything that must outlive the frame.
#[derive(Clone, Debug)]
pub struct TrajectorySampler {
    points: Vec<Vector3<f32>>,
    time_step: f32,
}

impl TrajectorySampler {
    /// Create a sampler with `count` points (at least 2).
    pub fn new(count: usize) -> Self {
        let count = count.max(2);
        TrajectorySampler {
            points: vec![vec3(0.0, 0.0, 0.0); count],
            time_step: 0.0,
        }
    }

    /// Resize the buffer. No-op (and no reallocation) when the count is unchanged.
    pub fn set_point_count(&mut self, count: usize) {
        let count = count.max(2);
        if count != self.points.len() {
            self.points = vec![vec3(0.0, 0.0, 0.0); count];
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Overwrite the buffer with points at `t_i = i · span / (N - 1)`.
    pub fn sample(&mut self, motion: &MotionParameters, span: f32) -> &[Vector3<f32>] {
        let segments = (self.points.len() - 1) as f32;
        self.time_step = span / segments;

        self.points[0] = motion.origin;
        for i in 1..self.points.len() {
            self.points[i] = motion.position_at(i as f32 * self.time_step);
        }

        &self.points
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// Motion-model time of the sample at `index` from the last `sample` call
    pub fn time_at(&self, index: usize) -> f32 {
        index as f32 * self.time_step
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Total polyline length of the current samples
    pub fn arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_throw() -> MotionParameters {
        MotionParameters::ballistic(vec3(0.0, 1.6, 0.0), vec3(0.0, 0.0, -1.0), 5.0, -9.8)
    }

    #[test]
    fn test_sample_count_and_origin() {
        for count in [2usize, 5, 30] {
            let mut sampler = TrajectorySampler::new(count);
            let points = sampler.sample(&horizontal_throw(), 1.0);

            assert_eq!(points.len(), count);
            assert_eq!(points[0], vec3(0.0, 1.6, 0.0));
        }
    }

    #[test]
    fn test_sample_times_strictly_increase() {
        let mut sampler = TrajectorySampler::new(10);
        sampler.sample(&horizontal_throw(), 2.0);

        assert_eq!(sampler.time_at(0), 0.0);
        for i in 1..sampler.len() {
            assert!(sampler.time_at(i) > sampler.time_at(i - 1));
        }
        assert!((sampler.time_at(9) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_points_follow_motion_model() {
        let motion = horizontal_throw();
        let mut sampler = TrajectorySampler::new(5);
        sampler.sample(&motion, 1.0);

        for (i, point) in sampler.points().iter().enumerate() {
            let expected = motion.position_at(i as f32 * 0.25);
            assert!((point - expected).magnitude() < 1e-6);
        }
    }

    #[test]
    fn test_point_count_is_clamped_and_resizes_only_on_change() {
        let mut sampler = TrajectorySampler::new(1);
        assert_eq!(sampler.len(), 2);

        sampler.set_point_count(12);
        let before = sampler.points().as_ptr();
        sampler.set_point_count(12);
        sampler.sample(&horizontal_throw(), 1.0);
        assert_eq!(sampler.points().as_ptr(), before);
        assert_eq!(sampler.len(), 12);
    }

    #[test]
    fn test_arc_length() {
        let mut sampler = TrajectorySampler::new(2);
        let motion = MotionParameters::linear(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), 7.0);
        sampler.sample(&motion, 1.0);
        assert!((sampler.arc_length() - 7.0).abs() < 1e-6);

        let mut arc = TrajectorySampler::new(20);
        arc.sample(&horizontal_throw(), 1.0);
        let chord = (arc.points()[19] - arc.points()[0]).magnitude();
        assert!(arc.arc_length() >= chord);
    }
}
