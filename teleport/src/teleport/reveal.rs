use cgmath::Vector3;

use super::collision::TeleportHit;
use crate::config::TeleportConfig;

/// Drives how much of the aimed path is drawn, from the time since aiming (re)started.
#[derive(Clone, Debug)]
pub struct RevealScheduler {
    elapsed_ms: f32,
    target_ms: f32,
    incremental: bool,
    /// Whether any frame has been accumulated since the last reset
    started: bool,
}

impl RevealScheduler {
    pub fn new(target_ms: f32, incremental: bool) -> Self {
        RevealScheduler {
            elapsed_ms: 0.0,
            target_ms: target_ms.max(0.0),
            incremental,
            started: false,
        }
    }

    pub fn from_config(config: &TeleportConfig) -> Self {
        Self::new(config.incremental_draw_ms, config.draw_incrementally)
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.started = false;
    }

    /// Accumulate frame time, clamped to the reveal duration. Without incremental
    /// drawing the reveal completes on the first frame.
    pub fn advance(&mut self, delta_ms: f32) {
        self.started = true;
        if !self.incremental {
            self.elapsed_ms = self.target_ms;
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + delta_ms.max(0.0)).min(self.target_ms);
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn target_ms(&self) -> f32 {
        self.target_ms
    }

    /// Fraction of the reveal shown, in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.target_ms <= 0.0 {
            return if self.started { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms / self.target_ms).clamp(0.0, 1.0)
    }

    /// A hit can only be committed once this is true
    pub fn is_complete(&self) -> bool {
        self.started && self.elapsed_ms >= self.target_ms
    }

    /// Last sample index drawn for a hit in segment `segment_index`
    pub fn cutoff_index(&self, segment_index: usize) -> usize {
        (self.fraction() * segment_index as f32).round() as usize
    }

    /// Write the displayed path into `out`, which ends up with one entry per sample.
    ///
    /// With a hit, samples past the cutoff collapse onto the cutoff point so the line stops
    /// growing there, and a fully revealed line ends exactly on the hit point. Without a hit
    /// the whole buffer is shown.
    pub fn displayed_path(
        &self,
        samples: &[Vector3<f32>],
        hit: Option<&TeleportHit>,
        out: &mut Vec<Vector3<f32>>,
    ) {
        out.clear();
        out.extend_from_slice(samples);

        let Some(hit) = hit else {
            return;
        };
        if samples.is_empty() {
            return;
        }

        let segment_index = hit.segment_index.min(samples.len() - 1);
        let cutoff = self.cutoff_index(segment_index);
        let cutoff_point = if cutoff == segment_index {
            hit.point
        } else {
            samples[cutoff]
        };

        for point in out.iter_mut().skip(cutoff) {
            *point = cutoff_point;
        }
    }
}
