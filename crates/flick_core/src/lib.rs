//! Flick Core
//!
//! Foundational primitives shared by the Flick scroll engine crates:
//!
//! - **Geometry**: fractional pointer points/vectors, whole-pixel offsets and sizes
//! - **State Machines**: flat state machines driven by event ids
//! - **Event Dispatch**: host-registered callbacks for engine notifications
//!
//! # Example
//!
//! ```rust
//! use flick_core::events::{event_types, EventDispatcher, ScrollEvent};
//! use flick_core::Offset;
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.register(event_types::OFFSET_CHANGED, |e| {
//!     println!("scrolled: {:?}", e.data);
//! });
//! dispatcher.dispatch(&ScrollEvent::offset_delta(Offset::new(0, 12), 0.0));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{EventData, EventDispatcher, EventType, HandlerId, ScrollEvent};
pub use fsm::{StateMachine, StateTransitions};
pub use geometry::{Axis, Offset, PerAxis, Point, Size, Vec2};
