//! Time-parameterised eased progress
//!
//! A [`Tween`] knows when it started, how long it runs and which curve it
//! follows. Owners keep their own start/end values and interpolate with the
//! eased progress it reports, so one tween can drive a 2D position or a pair
//! of per-axis scalars in lock-step.

use crate::easing::Easing;

/// One sampled frame of a running tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenFrame {
    /// Eased progress in `[0, 1]`
    pub progress: f32,
    /// True on the frame that completes the tween
    pub finished: bool,
}

impl TweenFrame {
    /// Interpolate between two values with this frame's progress
    pub fn lerp(&self, from: f32, to: f32) -> f32 {
        if self.finished {
            // Land exactly on the end value
            return to;
        }
        from + (to - from) * self.progress
    }
}

/// An eased, fixed-duration animation clock
#[derive(Clone, Debug)]
pub struct Tween {
    easing: Easing,
    start_ms: f64,
    duration_ms: f64,
    playing: bool,
    last_progress: f32,
}

impl Tween {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            start_ms: 0.0,
            duration_ms: 0.0,
            playing: false,
            last_progress: 0.0,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Start (or restart) the tween at `now_ms`
    pub fn start(&mut self, now_ms: f64, duration_ms: f64) {
        self.start_ms = now_ms;
        self.duration_ms = duration_ms.max(0.0);
        self.playing = true;
        self.last_progress = 0.0;
    }

    /// Stop without producing a finishing frame. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Eased progress of the last sampled frame
    pub fn progress(&self) -> f32 {
        self.last_progress
    }

    /// Linear (un-eased) progress at a point in time
    pub fn linear_progress_at(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Sample the tween at `now_ms`
    ///
    /// Returns None while idle. The frame that reaches the end of the
    /// duration has `finished == true` and stops the tween.
    pub fn tick(&mut self, now_ms: f64) -> Option<TweenFrame> {
        if !self.playing {
            return None;
        }

        let t = self.linear_progress_at(now_ms);
        let finished = t >= 1.0;
        let progress = if finished { 1.0 } else { self.easing.apply(t) };

        self.last_progress = progress;
        if finished {
            self.playing = false;
        }

        Some(TweenFrame { progress, finished })
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}
