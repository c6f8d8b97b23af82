//! State Machine Runtime
//!
//! Flat state machines for interaction states. A state type describes its
//! own transition table through [`StateTransitions`]; [`StateMachine`] holds
//! the current state and applies events to it.

use crate::events::EventType;

/// Trait for states that know their own transitions
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
    /// Most recent transition (for debugging)
    last_transition: Option<(S, EventType, S)>,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            last_transition: None,
        }
    }

    /// Get the current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Check if an event can trigger a transition from the current state
    pub fn can_send(&self, event: EventType) -> bool {
        self.current.on_event(event).is_some()
    }

    /// Send an event, returning the new state if a transition happened
    pub fn send(&mut self, event: EventType) -> Option<S> {
        let from = self.current;
        let to = from.on_event(event)?;
        if to != from {
            tracing::debug!("state {:?} --{}--> {:?}", from, event, to);
        }
        self.current = to;
        self.last_transition = Some((from, event, to));
        Some(to)
    }

    /// The most recent transition as (from, event, to)
    pub fn last_transition(&self) -> Option<(S, EventType, S)> {
        self.last_transition
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
