//! Overscroll pressure model
//!
//! The authoritative offset never leaves its bounds. What the user feels when
//! pushing past an edge is carried by a per-axis pressure instead: excess
//! drag distance is integrated into a saturating accumulator, and once the
//! gesture ends the pressure is eased back to zero. Hosts read it every frame
//! to size an edge glow or stretch the content.
//!
//! Sign convention: negative pressure pushes against the start edge (offset
//! 0), positive pressure against the end edge (max offset).

use flick_animation::{Animation, Tween};
use flick_core::{Axis, PerAxis};

use crate::config::BounceConfig;

/// Bounded, decaying per-axis overscroll pressure
#[derive(Clone, Debug)]
pub struct OverscrollBounce {
    pressure: PerAxis<f32>,
    /// Pressure at the moment the running decay started
    decay_from: PerAxis<f32>,
    tween: Tween,
    /// Time of the last decay start or sampled frame
    last_ms: f64,
    max_pressure: f32,
    gain: f32,
    decay_ms: u32,
}

impl OverscrollBounce {
    pub fn new(config: &BounceConfig) -> Self {
        Self {
            pressure: PerAxis::splat(0.0),
            decay_from: PerAxis::splat(0.0),
            tween: Tween::new(config.easing),
            last_ms: 0.0,
            max_pressure: config.max_pressure,
            gain: config.gain,
            decay_ms: config.decay_ms,
        }
    }

    pub fn set_config(&mut self, config: &BounceConfig) {
        self.max_pressure = config.max_pressure;
        self.gain = config.gain;
        self.decay_ms = config.decay_ms;
        self.tween.set_easing(config.easing);
        for axis in Axis::ALL {
            self.pressure[axis] = self.pressure[axis].clamp(-self.max_pressure, self.max_pressure);
        }
        self.decay_from = self.pressure;

        // A running decay continues from the clamped pressure on the new curve
        if self.tween.is_playing() {
            self.tween.start(self.last_ms, self.decay_ms as f64);
        }
    }

    pub fn max_pressure(&self) -> f32 {
        self.max_pressure
    }

    /// Current pressure on an axis, in `[-max_pressure, max_pressure]`
    pub fn pressure(&self, axis: Axis) -> f32 {
        self.pressure[axis]
    }

    pub fn pressures(&self) -> PerAxis<f32> {
        self.pressure
    }

    pub fn is_decaying(&self) -> bool {
        self.tween.is_playing()
    }

    /// Integrate overscroll excess on an axis
    ///
    /// Negative excess means pushing before the start edge, positive past the
    /// end edge. Re-engaging an edge while the pressure is decaying stops the
    /// decay and resumes live accumulation from the current value.
    pub fn add_excess(&mut self, axis: Axis, amount: f32) {
        if amount == 0.0 || !amount.is_finite() {
            return;
        }

        if self.tween.is_playing() {
            tracing::trace!("bounce decay interrupted by new excess");
            self.tween.cancel();
        }

        let before = self.pressure[axis];
        self.pressure[axis] =
            (before + amount * self.gain).clamp(-self.max_pressure, self.max_pressure);

        tracing::trace!(
            "bounce {:?} excess={:.1} pressure {:.2} -> {:.2}",
            axis,
            amount,
            before,
            self.pressure[axis]
        );
    }

    /// Relax pressure after the user moved back away from the pushed edge
    ///
    /// Moves pressure toward zero by `|amount| * gain` without crossing it.
    pub fn ease_off(&mut self, axis: Axis, amount: f32) {
        let current = self.pressure[axis];
        if current == 0.0 || !amount.is_finite() {
            return;
        }
        let relief = amount.abs() * self.gain;
        self.pressure[axis] = if current > 0.0 {
            (current - relief).max(0.0)
        } else {
            (current + relief).min(0.0)
        };
    }

    /// Start easing all pressure back to zero
    ///
    /// Skipped when there is no pressure; a no-op while already decaying.
    pub fn decay(&mut self, now_ms: f64) {
        if self.tween.is_playing() {
            return;
        }
        if self.pressure.horizontal == 0.0 && self.pressure.vertical == 0.0 {
            return;
        }

        self.decay_from = self.pressure;
        self.last_ms = now_ms;
        self.tween.start(now_ms, self.decay_ms as f64);
        tracing::debug!(
            "bounce decay from ({:.2}, {:.2}) over {}ms",
            self.pressure.horizontal,
            self.pressure.vertical,
            self.decay_ms
        );
    }

    /// Drop all pressure immediately
    pub fn reset(&mut self) {
        self.tween.cancel();
        self.pressure = PerAxis::splat(0.0);
        self.decay_from = PerAxis::splat(0.0);
    }
}

impl Animation for OverscrollBounce {
    type Frame = PerAxis<f32>;

    fn tick(&mut self, now_ms: f64) -> Option<PerAxis<f32>> {
        let frame = self.tween.tick(now_ms)?;
        self.last_ms = now_ms;
        for axis in Axis::ALL {
            self.pressure[axis] = frame.lerp(self.decay_from[axis], 0.0);
        }
        if frame.finished {
            tracing::debug!("bounce settled");
        }
        Some(self.pressure)
    }

    /// Stop a running decay, keeping the pressure where it is
    fn cancel(&mut self) {
        self.tween.cancel();
    }

    fn is_active(&self) -> bool {
        self.tween.is_playing()
    }
}

impl Default for OverscrollBounce {
    fn default() -> Self {
        Self::new(&BounceConfig::default())
    }
}
