//! Scroll interaction state

use flick_core::events::event_types;
use flick_core::{EventType, StateTransitions};

/// Interaction state of a scroll controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollState {
    /// No pointer down, no fling running
    #[default]
    Idle,
    /// A pointer is down (pressed, possibly not yet past the drag threshold)
    Dragging,
    /// Decelerating after a release
    Flinging,
}

impl ScrollState {
    /// Whether the user or a fling is currently moving the content
    pub fn is_active(&self) -> bool {
        !matches!(self, ScrollState::Idle)
    }
}

impl StateTransitions for ScrollState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use event_types::*;
        use ScrollState::*;

        match (self, event) {
            (Idle, POINTER_DOWN) => Some(Dragging),
            // Catching a fling takes it over
            (Flinging, POINTER_DOWN) => Some(Dragging),
            (Dragging, FLING_START) => Some(Flinging),
            (Dragging, POINTER_UP) => Some(Idle),
            (Flinging, SETTLED) => Some(Idle),
            _ => None,
        }
    }
}
