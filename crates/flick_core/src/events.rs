//! Event dispatch system
//!
//! Event ids consumed by the scroll state machine and the notifications the
//! engine sends back to its host widget.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::geometry::Offset;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    // Input events (host -> engine)
    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;

    // Engine-internal transitions
    /// Release velocity was high enough to start a fling
    pub const FLING_START: EventType = 100;
    /// A fling ran to completion or was stopped
    pub const SETTLED: EventType = 101;

    // Notifications (engine -> host)
    /// The scroll offset moved; carries [`EventData::OffsetDelta`](super::EventData)
    pub const OFFSET_CHANGED: EventType = 200;
    /// A drag or fling interaction is about to start
    pub const INTERACTION_STARTED: EventType = 201;
    /// The interaction ended and the offset is at rest
    pub const INTERACTION_FINISHED: EventType = 202;
    /// A fling animation started after release
    pub const FLING_STARTED: EventType = 203;
}

/// A notification emitted by the engine
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    pub event_type: EventType,
    pub data: EventData,
    /// Host timestamp in milliseconds
    pub timestamp_ms: f64,
}

impl ScrollEvent {
    pub fn new(event_type: EventType, timestamp_ms: f64) -> Self {
        Self {
            event_type,
            data: EventData::None,
            timestamp_ms,
        }
    }

    pub fn offset_delta(delta: Offset, timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::OFFSET_CHANGED,
            data: EventData::OffsetDelta {
                dx: delta.x,
                dy: delta.y,
            },
            timestamp_ms,
        }
    }
}

/// Event-specific data
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventData {
    /// Offset change to apply to the scroll position before repainting
    OffsetDelta { dx: i32, dy: i32 },
    None,
}

new_key_type! {
    /// Handle returned by [`EventDispatcher::register`], used to unregister
    pub struct HandlerId;
}

/// Event handler function type
pub type EventHandler = Box<dyn FnMut(&ScrollEvent)>;

struct HandlerEntry {
    event_type: EventType,
    handler: EventHandler,
}

/// Dispatches engine notifications to handlers registered by the host
///
/// Handlers run in registration order for their event type.
pub struct EventDispatcher {
    handlers: SlotMap<HandlerId, HandlerEntry>,
    by_type: FxHashMap<EventType, SmallVec<[HandlerId; 2]>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
            by_type: FxHashMap::default(),
        }
    }

    /// Register an event handler for an event type
    pub fn register<F>(&mut self, event_type: EventType, handler: F) -> HandlerId
    where
        F: FnMut(&ScrollEvent) + 'static,
    {
        let id = self.handlers.insert(HandlerEntry {
            event_type,
            handler: Box::new(handler),
        });
        self.by_type.entry(event_type).or_default().push(id);
        id
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<F>(mut self, event_type: EventType, handler: F) -> Self
    where
        F: FnMut(&ScrollEvent) + 'static,
    {
        self.register(event_type, handler);
        self
    }

    /// Remove a handler. Returns false if it was already removed.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let Some(entry) = self.handlers.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_type.get_mut(&entry.event_type) {
            ids.retain(|h| *h != id);
            if ids.is_empty() {
                self.by_type.remove(&entry.event_type);
            }
        }
        true
    }

    /// Dispatch an event to all handlers registered for its type
    pub fn dispatch(&mut self, event: &ScrollEvent) {
        let Some(ids) = self.by_type.get(&event.event_type) else {
            return;
        };
        for id in ids {
            if let Some(entry) = self.handlers.get_mut(*id) {
                (entry.handler)(event);
            }
        }
    }

    /// Check whether anything listens for an event type
    pub fn has_handlers(&self, event_type: EventType) -> bool {
        self.by_type.contains_key(&event_type)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_routes_by_type() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let log = seen.clone();
        dispatcher.register(event_types::OFFSET_CHANGED, move |e| {
            log.borrow_mut().push(e.data);
        });

        dispatcher.dispatch(&ScrollEvent::offset_delta(Offset::new(0, 5), 1.0));
        dispatcher.dispatch(&ScrollEvent::new(event_types::INTERACTION_FINISHED, 2.0));

        assert_eq!(
            *seen.borrow(),
            vec![EventData::OffsetDelta { dx: 0, dy: 5 }]
        );
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();
        let mut dispatcher = EventDispatcher::new()
            .with(event_types::INTERACTION_STARTED, move |_| {
                first.borrow_mut().push(1)
            })
            .with(event_types::INTERACTION_STARTED, move |_| {
                second.borrow_mut().push(2)
            });

        dispatcher.dispatch(&ScrollEvent::new(event_types::INTERACTION_STARTED, 0.0));
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unregister() {
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.register(event_types::SETTLED, move |_| *counter.borrow_mut() += 1);

        dispatcher.dispatch(&ScrollEvent::new(event_types::SETTLED, 0.0));
        assert!(dispatcher.unregister(id));
        assert!(!dispatcher.unregister(id));
        dispatcher.dispatch(&ScrollEvent::new(event_types::SETTLED, 1.0));

        assert_eq!(*count.borrow(), 1);
        assert!(!dispatcher.has_handlers(event_types::SETTLED));
        assert_eq!(dispatcher.handler_count(), 0);
    }
}
