//! Scroll position indicators
//!
//! One [`FadingIndicator`] per axis. Geometry is re-derived from the content
//! length, viewport length and offset whenever any of them change; opacity is
//! driven by a [`RepeatingTimer`] that starts stepping the indicator out after
//! a quiet period.

use flick_animation::{Animation, RepeatingTimer};

use crate::config::{IndicatorConfig, IndicatorPolicy};

/// Alpha below this counts as fully faded
const ALPHA_EPSILON: f32 = 1e-4;

/// Where and how large to paint an indicator, as fractions of its track
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndicatorGeometry {
    /// Whether the indicator should be painted at all
    pub visible: bool,
    /// Thumb length relative to the track, in `(0, 1]`
    pub size_fraction: f32,
    /// Thumb start relative to the track, in `[0, 1 - size_fraction]`
    pub position_fraction: f32,
}

impl IndicatorGeometry {
    /// Thumb `(start, length)` in pixels for a track of `track_len` pixels
    pub fn thumb_span(&self, track_len: f32) -> (f32, f32) {
        (
            self.position_fraction * track_len,
            self.size_fraction * track_len,
        )
    }
}

/// A proportional scroll indicator that fades out after activity stops
#[derive(Clone, Debug)]
pub struct FadingIndicator {
    policy: IndicatorPolicy,
    /// Content overflows the viewport on this axis
    needed: bool,
    size_fraction: f32,
    position_fraction: f32,
    alpha: f32,
    /// Fade steps applied since the indicator was last shown
    steps: u32,
    timer: RepeatingTimer,
    fade_timeout_ms: f64,
    fade_step: f32,
    min_length: f32,
}

impl FadingIndicator {
    pub fn new(policy: IndicatorPolicy, config: &IndicatorConfig) -> Self {
        Self {
            policy,
            needed: false,
            size_fraction: 1.0,
            position_fraction: 0.0,
            alpha: 0.0,
            steps: 0,
            timer: RepeatingTimer::new(config.fade_interval_ms as f64),
            fade_timeout_ms: config.fade_timeout_ms as f64,
            fade_step: config.fade_step,
            min_length: config.min_length,
        }
    }

    pub fn set_config(&mut self, policy: IndicatorPolicy, config: &IndicatorConfig) {
        self.policy = policy;
        self.timer.set_interval(config.fade_interval_ms as f64);
        self.fade_timeout_ms = config.fade_timeout_ms as f64;
        self.fade_step = config.fade_step;
        self.min_length = config.min_length;
        if policy != IndicatorPolicy::AsNeeded {
            self.timer.stop();
        }
    }

    pub fn policy(&self) -> IndicatorPolicy {
        self.policy
    }

    /// Whether the content overflows on this axis
    pub fn is_needed(&self) -> bool {
        self.needed
    }

    /// Re-derive geometry from the axis lengths and the current offset
    pub fn refresh(&mut self, content: i32, viewport: i32, offset: i32) {
        if content <= 0 || viewport <= 0 || viewport >= content {
            if self.needed {
                tracing::trace!("indicator hidden: content {} fits viewport {}", content, viewport);
            }
            self.needed = false;
            self.size_fraction = 1.0;
            self.position_fraction = 0.0;
            self.alpha = 0.0;
            self.timer.stop();
            return;
        }

        let content = content as f32;
        let viewport = viewport as f32;

        let raw = viewport / content;
        let size = raw.max(self.min_length / viewport).min(1.0);
        let progress = (offset as f32 / (content - viewport)).clamp(0.0, 1.0);

        self.needed = true;
        self.size_fraction = size;
        self.position_fraction = progress * (1.0 - size);
    }

    /// Current paint geometry
    pub fn geometry(&self) -> IndicatorGeometry {
        IndicatorGeometry {
            visible: self.alpha() > 0.0,
            size_fraction: self.size_fraction,
            position_fraction: self.position_fraction,
        }
    }

    /// Current opacity in `[0, 1]`, after applying the policy
    pub fn alpha(&self) -> f32 {
        if !self.needed {
            return 0.0;
        }
        match self.policy {
            IndicatorPolicy::AlwaysOn => 1.0,
            IndicatorPolicy::AlwaysOff => 0.0,
            IndicatorPolicy::AsNeeded => self.alpha,
        }
    }

    fn fades(&self) -> bool {
        self.needed && self.policy == IndicatorPolicy::AsNeeded
    }

    /// Flash the indicator at full opacity and (re)start the fade countdown
    pub fn show(&mut self, now_ms: f64) {
        if !self.fades() {
            return;
        }
        self.alpha = 1.0;
        self.steps = 0;
        self.timer.start(now_ms, self.fade_timeout_ms);
    }

    /// Keep the indicator at full opacity until [`release`](Self::release)
    pub fn hold(&mut self) {
        if !self.fades() {
            return;
        }
        self.alpha = 1.0;
        self.steps = 0;
        self.timer.stop();
    }

    /// Start the fade countdown if the indicator is shown and not yet fading
    pub fn release(&mut self, now_ms: f64) {
        if !self.fades() || self.alpha <= 0.0 || self.timer.is_active() {
            return;
        }
        self.timer.start(now_ms, self.fade_timeout_ms);
    }

    /// Whether a fade countdown or fade is in progress
    pub fn is_fading(&self) -> bool {
        self.timer.is_active()
    }
}

impl Animation for FadingIndicator {
    /// Opacity after the tick
    type Frame = f32;

    fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if !self.timer.is_active() {
            return None;
        }

        while self.timer.poll_once(now_ms) {
            self.steps += 1;
            self.alpha = (1.0 - self.steps as f32 * self.fade_step).max(0.0);
            if self.alpha <= ALPHA_EPSILON {
                self.alpha = 0.0;
                self.timer.stop();
                tracing::trace!("indicator faded out");
            }
        }

        Some(self.alpha())
    }

    fn cancel(&mut self) {
        self.timer.stop();
    }

    fn is_active(&self) -> bool {
        self.timer.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator() -> FadingIndicator {
        FadingIndicator::new(IndicatorPolicy::AsNeeded, &IndicatorConfig::default())
    }

    fn run_until_idle(indicator: &mut FadingIndicator, from_ms: f64) -> f64 {
        let mut now = from_ms;
        while indicator.is_active() {
            now += 1.0;
            indicator.tick(now);
        }
        now
    }

    #[test]
    fn test_hidden_when_content_fits() {
        let mut ind = indicator();
        ind.refresh(200, 200, 0);
        ind.show(0.0);
        assert!(!ind.geometry().visible);
        assert!(!ind.is_active());

        ind.refresh(100, 300, 0);
        assert!(!ind.is_needed());

        ind.refresh(0, 300, 0);
        assert!(!ind.is_needed());
        ind.refresh(1000, -5, 0);
        assert!(!ind.is_needed());
    }

    #[test]
    fn test_proportional_geometry() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        let g = ind.geometry();
        assert_eq!(g.size_fraction, 0.2);
        assert_eq!(g.position_fraction, 0.0);

        ind.refresh(1000, 200, 400);
        assert!((ind.geometry().position_fraction - 0.4).abs() < 1e-6);

        ind.refresh(1000, 200, 800);
        let g = ind.geometry();
        assert!((g.position_fraction + g.size_fraction - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_min_length_keeps_thumb_in_track() {
        let mut ind = indicator();
        ind.refresh(10_000, 200, 9800);
        ind.show(0.0);
        let (start, len) = ind.geometry().thumb_span(200.0);
        assert!((len - 30.0).abs() < 1e-3);
        assert!((start - 170.0).abs() < 1e-3);
    }

    #[test]
    fn test_fade_timeout_then_steps() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.show(0.0);
        assert_eq!(ind.alpha(), 1.0);

        ind.tick(599.0);
        assert_eq!(ind.alpha(), 1.0);
        ind.tick(600.0);
        assert!((ind.alpha() - 0.9).abs() < 1e-6);

        // 10 steps of 0.1 at 50ms intervals
        ind.tick(1049.0);
        assert!(ind.alpha() > 0.0);
        ind.tick(1050.0);
        assert_eq!(ind.alpha(), 0.0);
        assert!(!ind.is_active());
        assert!(!ind.geometry().visible);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.show(0.0);
        assert_eq!(ind.tick(5000.0), Some(0.0));
        assert_eq!(ind.tick(6000.0), None);
    }

    #[test]
    fn test_show_twice_restarts_fade() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.show(0.0);
        ind.tick(700.0);
        assert!(ind.alpha() < 1.0);

        ind.show(500.0);
        assert_eq!(ind.alpha(), 1.0);
        let hidden_at = run_until_idle(&mut ind, 500.0);
        assert_eq!(hidden_at, 500.0 + 600.0 + 9.0 * 50.0);
    }

    #[test]
    fn test_hold_and_release() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.hold();
        assert_eq!(ind.alpha(), 1.0);
        assert!(!ind.is_active());
        assert!(ind.tick(10_000.0).is_none());

        ind.release(100.0);
        assert!(ind.is_active());
        // Releasing again does not push the countdown back
        ind.release(400.0);
        ind.tick(700.0);
        assert!(ind.alpha() < 1.0);
    }

    #[test]
    fn test_release_without_show_stays_hidden() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.release(0.0);
        assert!(!ind.is_active());
        assert_eq!(ind.alpha(), 0.0);
    }

    #[test]
    fn test_content_shrinking_cancels_fade() {
        let mut ind = indicator();
        ind.refresh(1000, 200, 0);
        ind.show(0.0);
        ind.refresh(150, 200, 0);
        assert!(!ind.is_active());
        assert_eq!(ind.alpha(), 0.0);
    }

    #[test]
    fn test_policies() {
        let config = IndicatorConfig::default();

        let mut on = FadingIndicator::new(IndicatorPolicy::AlwaysOn, &config);
        on.refresh(1000, 200, 0);
        assert_eq!(on.alpha(), 1.0);
        on.show(0.0);
        assert!(!on.is_active());
        on.refresh(100, 200, 0);
        assert_eq!(on.alpha(), 0.0);

        let mut off = FadingIndicator::new(IndicatorPolicy::AlwaysOff, &config);
        off.refresh(1000, 200, 0);
        off.show(0.0);
        assert_eq!(off.alpha(), 0.0);
        assert!(!off.geometry().visible);
    }
}
