//! Flick Animation System
//!
//! Host-clocked building blocks for scroll animations.
//!
//! # Features
//!
//! - **Easing Curves**: cubic/quartic/circular families and CSS-style cubic beziers
//! - **Tweens**: fixed-duration eased progress sampled from host timestamps
//! - **Repeating Timers**: polled timers with catch-up for stepped fades
//! - **Cancellable**: every animation stops immediately and idempotently

pub mod animation;
pub mod easing;
pub mod timer;
pub mod tween;

pub use animation::Animation;
pub use easing::Easing;
pub use timer::RepeatingTimer;
pub use tween::{Tween, TweenFrame};
