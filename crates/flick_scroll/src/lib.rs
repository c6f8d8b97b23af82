//! Flick Scroll
//!
//! Kinetic scrolling engine for one scrollable surface. The host feeds
//! pointer and wheel input with timestamps, calls `tick` from its frame loop,
//! and repaints from the notifications and getters:
//!
//! - **Drag**: content tracks the pointer 1:1 once it passes the drag threshold
//! - **Fling**: a fast release decelerates along an eased curve
//! - **Overscroll**: the offset never leaves its bounds; pushing past an edge
//!   builds a bounded pressure that decays after release
//! - **Indicators**: proportional scroll indicators that fade out when idle
//!
//! # Example
//!
//! ```rust
//! use flick_core::events::event_types;
//! use flick_core::{Point, Size};
//! use flick_scroll::{ScrollConfig, ScrollController};
//!
//! let mut scroll = ScrollController::new(ScrollConfig::default());
//! scroll.set_sizes(Size::new(320, 2000), Size::new(320, 480), 0.0);
//! scroll.on(event_types::OFFSET_CHANGED, |e| println!("{:?}", e.data));
//!
//! scroll.on_pointer_down(Point::new(100.0, 400.0), 0.0);
//! scroll.on_pointer_move(Point::new(100.0, 300.0), 16.0);
//! scroll.on_pointer_up(Point::new(100.0, 300.0), 500.0);
//!
//! assert_eq!(scroll.offset().y, 100);
//!
//! // From the host's frame loop
//! let animating = scroll.tick(520.0);
//! assert!(animating); // indicator still fading
//! ```

pub mod bounce;
pub mod config;
pub mod controller;
pub mod error;
pub mod fling;
pub mod indicator;
pub mod state;
pub mod velocity;

pub use bounce::OverscrollBounce;
pub use config::{
    BounceConfig, FlingConfig, IndicatorConfig, IndicatorPolicy, ScrollConfig, ScrollDirection,
};
pub use controller::{DeltaSplit, ScrollController};
pub use error::{ConfigError, Result};
pub use fling::{FlingAnimator, FlingFrame};
pub use indicator::{FadingIndicator, IndicatorGeometry};
pub use state::ScrollState;
pub use velocity::{VelocitySample, VelocitySampler};
