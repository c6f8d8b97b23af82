//! Release velocity estimation
//!
//! Keeps the anchor sample of the current stroke and the latest sample. The
//! estimate is the slope between them, so it always describes the most recent
//! stretch of motion rather than the whole drag.

use flick_core::{Axis, Point, Vec2};

/// A timestamped pointer position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocitySample {
    pub position: Point,
    pub timestamp_ms: f64,
}

/// Converts timestamped pointer positions into a velocity estimate
#[derive(Clone, Debug)]
pub struct VelocitySampler {
    /// First sample of the current stroke
    anchor: Option<VelocitySample>,
    latest: Option<VelocitySample>,
    /// Samples further apart than this are never used together
    stale_ms: f64,
}

impl VelocitySampler {
    pub fn new(stale_ms: f64) -> Self {
        Self {
            anchor: None,
            latest: None,
            stale_ms,
        }
    }

    /// Change the stale threshold, keeping the current stroke
    pub fn set_stale_ms(&mut self, stale_ms: f64) {
        self.stale_ms = stale_ms;
    }

    /// Forget all samples (pointer down)
    pub fn reset(&mut self) {
        self.anchor = None;
        self.latest = None;
    }

    pub fn sample_count(&self) -> usize {
        match (self.anchor, self.latest) {
            (Some(_), Some(_)) => 2,
            (None, Some(_)) => 1,
            _ => 0,
        }
    }

    /// Record a pointer position
    pub fn on_sample(&mut self, position: Point, timestamp_ms: f64) {
        let sample = VelocitySample {
            position,
            timestamp_ms,
        };

        let Some(latest) = self.latest else {
            self.latest = Some(sample);
            return;
        };

        let gap_ms = sample.timestamp_ms - latest.timestamp_ms;
        if gap_ms < 0.0 || gap_ms > self.stale_ms {
            // Clock went backwards or the pointer rested: start over from here
            self.anchor = None;
        } else if self.anchor.is_none() || self.slides_window(latest, sample) {
            self.anchor = Some(latest);
        }

        self.latest = Some(sample);
    }

    /// Whether `next` begins a new stroke that should be anchored at `latest`
    fn slides_window(&self, latest: VelocitySample, next: VelocitySample) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };

        if next.timestamp_ms - anchor.timestamp_ms > self.stale_ms {
            return true;
        }

        // Direction reversed on either axis
        Axis::ALL.iter().any(|&axis| {
            let before = latest.position.get(axis) - anchor.position.get(axis);
            let after = next.position.get(axis) - latest.position.get(axis);
            before * after < 0.0
        })
    }

    /// Estimated velocity in units per second at `now_ms`
    ///
    /// Zero with fewer than two samples, or when the pointer has rested for
    /// longer than the stale threshold before `now_ms`.
    pub fn estimate(&self, now_ms: f64) -> Vec2 {
        let (Some(anchor), Some(latest)) = (self.anchor, self.latest) else {
            return Vec2::ZERO;
        };

        if now_ms - latest.timestamp_ms > self.stale_ms {
            return Vec2::ZERO;
        }

        let dt_ms = latest.timestamp_ms - anchor.timestamp_ms;
        if dt_ms <= 0.0 || dt_ms > self.stale_ms {
            return Vec2::ZERO;
        }

        let velocity = (latest.position - anchor.position).scale((1000.0 / dt_ms) as f32);
        tracing::trace!(
            "velocity estimate ({:.1}, {:.1}) px/s over {:.0}ms",
            velocity.x,
            velocity.y,
            dt_ms
        );
        velocity
    }
}

impl Default for VelocitySampler {
    fn default() -> Self {
        Self::new(300.0)
    }
}
