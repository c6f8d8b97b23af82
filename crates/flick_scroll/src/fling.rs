//! Post-release fling animation
//!
//! A fling covers `velocity * duration` pixels along an eased curve and
//! reports its motion as whole-pixel deltas, so the controller can feed them
//! through the same clamp path as drag deltas.

use flick_animation::{Animation, Tween};
use flick_core::{Offset, Vec2};

use crate::config::FlingConfig;

/// Motion produced by one fling tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlingFrame {
    /// Offset change since the previous frame
    pub delta: Offset,
    /// Set on the single frame that completes the fling
    pub finished: bool,
}

/// Drives the deceleration animation after a release
#[derive(Clone, Debug)]
pub struct FlingAnimator {
    tween: Tween,
    min_velocity: f32,
    duration_ms: u32,
    from: Offset,
    target: Offset,
    velocity: Vec2,
    /// Position reported by the previous frame
    last: Offset,
}

impl FlingAnimator {
    pub fn new(config: &FlingConfig) -> Self {
        Self {
            tween: Tween::new(config.easing),
            min_velocity: config.min_velocity,
            duration_ms: config.duration_ms,
            from: Offset::ZERO,
            target: Offset::ZERO,
            velocity: Vec2::ZERO,
            last: Offset::ZERO,
        }
    }

    /// Apply new settings; a running fling keeps its current curve
    pub fn set_config(&mut self, config: &FlingConfig) {
        self.min_velocity = config.min_velocity;
        self.duration_ms = config.duration_ms;
        if !self.tween.is_playing() {
            self.tween.set_easing(config.easing);
        }
    }

    /// Start flinging from `from` with `velocity` (offset units per second)
    ///
    /// Returns false and stays idle if neither axis reaches the minimum
    /// velocity, or if the travel rounds to nothing. An axis below the
    /// threshold does not move.
    pub fn start(&mut self, from: Offset, velocity: Vec2, now_ms: f64) -> bool {
        self.cancel();

        let velocity = Vec2::new(
            self.recognized(velocity.x),
            self.recognized(velocity.y),
        );
        if velocity.is_zero() {
            tracing::trace!("fling rejected: below {} px/s", self.min_velocity);
            return false;
        }

        let seconds = self.duration_ms as f64 / 1000.0;
        let travel = Offset::new(
            (velocity.x as f64 * seconds).round() as i32,
            (velocity.y as f64 * seconds).round() as i32,
        );
        if travel.is_zero() {
            return false;
        }

        self.from = from;
        self.target = from + travel;
        self.velocity = velocity;
        self.last = from;
        self.tween.start(now_ms, self.duration_ms as f64);

        tracing::debug!(
            "fling start {:?} -> {:?} at ({:.0}, {:.0}) px/s",
            self.from,
            self.target,
            velocity.x,
            velocity.y
        );
        true
    }

    fn recognized(&self, speed: f32) -> f32 {
        if speed.is_finite() && speed.abs() >= self.min_velocity {
            speed
        } else {
            0.0
        }
    }

    /// Unclamped end offset of the running fling
    pub fn target(&self) -> Option<Offset> {
        self.tween.is_playing().then_some(self.target)
    }

    /// Velocity the running fling was started with (zeroed axes stay put)
    pub fn velocity(&self) -> Vec2 {
        if self.tween.is_playing() {
            self.velocity
        } else {
            Vec2::ZERO
        }
    }
}

impl Animation for FlingAnimator {
    type Frame = FlingFrame;

    fn tick(&mut self, now_ms: f64) -> Option<FlingFrame> {
        let frame = self.tween.tick(now_ms)?;

        let position = Offset::new(
            frame.lerp(self.from.x as f32, self.target.x as f32).round() as i32,
            frame.lerp(self.from.y as f32, self.target.y as f32).round() as i32,
        );
        let delta = position - self.last;
        self.last = position;

        if frame.finished {
            tracing::debug!("fling finished at {:?}", position);
        }

        Some(FlingFrame {
            delta,
            finished: frame.finished,
        })
    }

    fn cancel(&mut self) {
        if self.tween.is_playing() {
            tracing::debug!("fling cancelled at {:?}", self.last);
        }
        self.tween.cancel();
    }

    fn is_active(&self) -> bool {
        self.tween.is_playing()
    }
}

impl Default for FlingAnimator {
    fn default() -> Self {
        Self::new(&FlingConfig::default())
    }
}
