//! Gesture replay on a virtual frame clock

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use flick_core::events::event_types;
use flick_core::{Axis, EventData, EventType, Offset, PerAxis, Point, Size};
use flick_scroll::{ScrollConfig, ScrollController, ScrollState};

use crate::gesture::{GestureEvent, GestureScript, MIN_FRAME_MS};

pub const DEFAULT_FRAME_MS: f64 = 16.0;

/// Frames keep running this long after the last event at most
const SETTLE_LIMIT_MS: f64 = 30_000.0;

/// Hard cap on recorded frames
const MAX_FRAMES: usize = 200_000;

/// A host frame loop that advances in fixed steps
#[derive(Debug, Clone, Copy)]
struct FrameClock {
    frame_ms: f64,
    frame: u64,
}

impl FrameClock {
    fn new(frame_ms: f64) -> Self {
        Self { frame_ms, frame: 0 }
    }

    fn now(&self) -> f64 {
        self.frame as f64 * self.frame_ms
    }

    fn advance(&mut self) {
        self.frame += 1;
    }
}

/// Engine state sampled at the end of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    pub at_ms: f64,
    pub offset: Offset,
    pub state: ScrollState,
    pub pressure: PerAxis<f32>,
    pub alpha: PerAxis<f32>,
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>7.0}ms  offset=({:>5}, {:>5})  {:<8}  pressure=({:>6.2}, {:>6.2})  alpha=({:.2}, {:.2})",
            self.at_ms,
            self.offset.x,
            self.offset.y,
            format!("{:?}", self.state),
            self.pressure.horizontal,
            self.pressure.vertical,
            self.alpha.horizontal,
            self.alpha.vertical,
        )
    }
}

/// Notification counts observed during a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Notifications {
    pub offset_changes: u32,
    pub interactions_started: u32,
    pub flings_started: u32,
    pub interactions_finished: u32,
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub frames: Vec<FrameRecord>,
    pub notifications: Notifications,
    /// Sum of all reported offset deltas
    pub reported_offset: Offset,
}

impl Replay {
    pub fn final_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }
}

fn size(pair: [i32; 2]) -> Size {
    Size::new(pair[0], pair[1])
}

fn deliver(scroll: &mut ScrollController, event: GestureEvent) {
    match event {
        GestureEvent::Down { at_ms, x, y } => scroll.on_pointer_down(Point::new(x, y), at_ms),
        GestureEvent::Move { at_ms, x, y } => scroll.on_pointer_move(Point::new(x, y), at_ms),
        GestureEvent::Up { at_ms, x, y } => scroll.on_pointer_up(Point::new(x, y), at_ms),
        GestureEvent::Wheel { at_ms, dx, dy } => scroll.on_wheel(Offset::new(dx, dy), at_ms),
        GestureEvent::Resize {
            at_ms,
            content,
            viewport,
        } => scroll.set_sizes(size(content), size(viewport), at_ms),
    }
}

fn count_into(
    scroll: &mut ScrollController,
    event_type: EventType,
    counts: &Rc<RefCell<Notifications>>,
    bump: fn(&mut Notifications),
) {
    let counts = counts.clone();
    scroll.on(event_type, move |_| bump(&mut counts.borrow_mut()));
}

/// Play a script against a fresh controller
///
/// Events due by a frame are delivered with their own timestamps, then the
/// frame is ticked and recorded. Runs until the script is exhausted and the
/// engine is at rest.
pub fn run(config: ScrollConfig, script: &GestureScript, frame_ms: f64) -> Replay {
    let mut scroll = ScrollController::new(config);
    let notifications = Rc::new(RefCell::new(Notifications::default()));
    let reported = Rc::new(RefCell::new(Offset::ZERO));

    {
        let counts = notifications.clone();
        let total = reported.clone();
        scroll.on(event_types::OFFSET_CHANGED, move |e| {
            counts.borrow_mut().offset_changes += 1;
            if let EventData::OffsetDelta { dx, dy } = e.data {
                let mut t = total.borrow_mut();
                *t = *t + Offset::new(dx, dy);
            }
        });
    }
    count_into(&mut scroll, event_types::INTERACTION_STARTED, &notifications, |n| {
        n.interactions_started += 1
    });
    count_into(&mut scroll, event_types::FLING_STARTED, &notifications, |n| {
        n.flings_started += 1
    });
    count_into(&mut scroll, event_types::INTERACTION_FINISHED, &notifications, |n| {
        n.interactions_finished += 1
    });

    scroll.set_sizes(size(script.content), size(script.viewport), 0.0);

    let events = script.sorted_events();
    let last_event_ms = events.last().map_or(0.0, |e| e.at_ms());
    let mut pending = events.into_iter().peekable();

    let mut clock = FrameClock::new(if frame_ms.is_finite() && frame_ms >= MIN_FRAME_MS {
        frame_ms
    } else {
        DEFAULT_FRAME_MS
    });
    let mut frames = Vec::new();

    loop {
        let now = clock.now();
        while let Some(event) = pending.next_if(|e| e.at_ms() <= now) {
            tracing::trace!("deliver {:?}", event);
            deliver(&mut scroll, event);
        }

        let animating = scroll.tick(now);
        frames.push(FrameRecord {
            at_ms: now,
            offset: scroll.offset(),
            state: scroll.state(),
            pressure: PerAxis::new(
                scroll.bounce_pressure(Axis::Horizontal),
                scroll.bounce_pressure(Axis::Vertical),
            ),
            alpha: PerAxis::new(
                scroll.indicator_alpha(Axis::Horizontal),
                scroll.indicator_alpha(Axis::Vertical),
            ),
        });

        if pending.peek().is_none() && !animating {
            break;
        }
        if now > last_event_ms + SETTLE_LIMIT_MS {
            tracing::warn!("replay stopped after {:.0}ms without settling", now);
            break;
        }
        if frames.len() >= MAX_FRAMES {
            tracing::warn!("replay stopped at the {} frame limit", MAX_FRAMES);
            break;
        }
        clock.advance();
    }

    tracing::debug!("replayed {} frames", frames.len());

    let notifications = *notifications.borrow();
    let reported_offset = *reported.borrow();
    Replay {
        frames,
        notifications,
        reported_offset,
    }
}
