//! Common surface of restartable animations
//!
//! Fling, bounce decay and indicator fade each run their own clock. The
//! orchestrator composes them through this trait and ticks them in a fixed
//! order from the host's frame loop.

/// A restartable, host-ticked animation
///
/// How an animation starts differs per kind, so `start` is left to the
/// implementor; ticking and cancelling are uniform.
pub trait Animation {
    /// What one tick produces for the owner (a delta, a value, ...)
    type Frame;

    /// Advance to `now_ms`. Returns None when idle.
    fn tick(&mut self, now_ms: f64) -> Option<Self::Frame>;

    /// Stop immediately, leaving no pending tick. Idempotent.
    fn cancel(&mut self);

    /// Whether the animation still needs ticks
    fn is_active(&self) -> bool;
}
