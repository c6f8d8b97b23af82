//! Scroll controller
//!
//! Owns the authoritative offset and composes the velocity sampler, fling,
//! overscroll bounce and indicators into one engine driven by the host:
//!
//! - pointer and wheel input arrive through `on_pointer_*` / `on_wheel`
//! - every movement goes through [`ScrollController::apply_delta`], which
//!   clamps the offset and forwards the remainder to the bounce model
//! - `tick(now_ms)` advances the fling, then the indicators, then the bounce
//!
//! The host repaints from the `OFFSET_CHANGED` notifications and the
//! indicator/bounce getters.

use flick_animation::Animation;
use flick_core::events::event_types;
use flick_core::{
    Axis, EventDispatcher, EventType, HandlerId, Offset, PerAxis, Point, ScrollEvent, Size,
    StateMachine, Vec2,
};

use crate::bounce::OverscrollBounce;
use crate::config::ScrollConfig;
use crate::fling::FlingAnimator;
use crate::indicator::{FadingIndicator, IndicatorGeometry};
use crate::state::ScrollState;
use crate::velocity::VelocitySampler;

/// How a delta was split by the clamp
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeltaSplit {
    /// Part of the delta that moved the offset
    pub applied: Offset,
    /// Part that would have left the valid range
    pub excess: Offset,
}

/// An active press
#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Point,
    /// Offset delta already applied for this press
    consumed: Offset,
    /// Pointer travelled past the drag threshold
    dragging: bool,
}

/// Kinetic scroll engine for one scrollable surface
#[derive(Debug)]
pub struct ScrollController {
    config: ScrollConfig,
    machine: StateMachine<ScrollState>,
    offset: Offset,
    content: Size,
    viewport: Size,
    sampler: VelocitySampler,
    fling: FlingAnimator,
    bounce: OverscrollBounce,
    indicators: PerAxis<FadingIndicator>,
    dispatcher: EventDispatcher,
    press: Option<Press>,
}

impl ScrollController {
    pub fn new(config: ScrollConfig) -> Self {
        Self::with_dispatcher(config, EventDispatcher::new())
    }

    /// Create a controller with handlers registered up front
    pub fn with_dispatcher(config: ScrollConfig, dispatcher: EventDispatcher) -> Self {
        let indicators = PerAxis::new(
            FadingIndicator::new(config.indicator.horizontal, &config.indicator),
            FadingIndicator::new(config.indicator.vertical, &config.indicator),
        );

        Self {
            machine: StateMachine::new(ScrollState::Idle),
            offset: Offset::ZERO,
            content: Size::ZERO,
            viewport: Size::ZERO,
            sampler: VelocitySampler::new(config.velocity_stale_ms as f64),
            fling: FlingAnimator::new(&config.fling),
            bounce: OverscrollBounce::new(&config.bounce),
            indicators,
            dispatcher,
            press: None,
            config,
        }
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Register a handler for an engine notification
    pub fn on<F>(&mut self, event_type: EventType, handler: F) -> HandlerId
    where
        F: FnMut(&ScrollEvent) + 'static,
    {
        self.dispatcher.register(event_type, handler)
    }

    /// Remove a handler registered with [`on`](Self::on)
    pub fn off(&mut self, id: HandlerId) -> bool {
        self.dispatcher.unregister(id)
    }

    fn notify(&mut self, event_type: EventType, now_ms: f64) {
        self.dispatcher.dispatch(&ScrollEvent::new(event_type, now_ms));
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn state(&self) -> ScrollState {
        self.machine.current()
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Largest valid offset on each axis
    pub fn max_offset(&self) -> Offset {
        Offset::new(
            self.max_offset_on(Axis::Horizontal),
            self.max_offset_on(Axis::Vertical),
        )
    }

    fn max_offset_on(&self, axis: Axis) -> i32 {
        if !self.scrollable(axis) {
            return 0;
        }
        (self.content.get(axis) - self.viewport.get(axis)).max(0)
    }

    /// Whether an axis has usable sizes at all
    ///
    /// Content that merely fits still counts: it cannot move but it can be
    /// pushed against its edges.
    fn scrollable(&self, axis: Axis) -> bool {
        self.content.get(axis) > 0 && self.viewport.get(axis) > 0
    }

    /// Whether input on an axis moves anything
    fn responds(&self, axis: Axis) -> bool {
        self.config.direction.allows(axis) && self.scrollable(axis)
    }

    pub fn indicator_geometry(&self, axis: Axis) -> IndicatorGeometry {
        self.indicators[axis].geometry()
    }

    pub fn indicator_alpha(&self, axis: Axis) -> f32 {
        self.indicators[axis].alpha()
    }

    pub fn bounce_pressure(&self, axis: Axis) -> f32 {
        self.bounce.pressure(axis)
    }

    /// Unclamped target of the running fling
    pub fn fling_target(&self) -> Option<Offset> {
        self.fling.target()
    }

    /// Whether `tick` still has work to do
    pub fn is_animating(&self) -> bool {
        self.fling.is_active()
            || self.bounce.is_active()
            || self.indicators.iter().any(|(_, ind)| ind.is_active())
    }

    // =========================================================================
    // Configuration & Sizes
    // =========================================================================

    /// Swap in new settings; running animations pick them up where they can
    pub fn set_config(&mut self, config: ScrollConfig) {
        self.sampler.set_stale_ms(config.velocity_stale_ms as f64);
        self.fling.set_config(&config.fling);
        self.bounce.set_config(&config.bounce);
        self.indicators
            .horizontal
            .set_config(config.indicator.horizontal, &config.indicator);
        self.indicators
            .vertical
            .set_config(config.indicator.vertical, &config.indicator);
        self.config = config;
    }

    pub fn set_sizes(&mut self, content: Size, viewport: Size, now_ms: f64) {
        self.content = content;
        self.viewport = viewport;
        self.on_content_or_viewport_resized(now_ms);
    }

    pub fn set_content_size(&mut self, content: Size, now_ms: f64) {
        self.content = content;
        self.on_content_or_viewport_resized(now_ms);
    }

    pub fn set_viewport_size(&mut self, viewport: Size, now_ms: f64) {
        self.viewport = viewport;
        self.on_content_or_viewport_resized(now_ms);
    }

    /// Re-clamp the offset and re-derive indicator geometry
    ///
    /// A correction is reported through `OFFSET_CHANGED` like any other move.
    /// Never starts a fling.
    pub fn on_content_or_viewport_resized(&mut self, now_ms: f64) {
        let max = self.max_offset();
        let clamped = Offset::new(
            self.offset.x.clamp(0, max.x),
            self.offset.y.clamp(0, max.y),
        );
        let correction = clamped - self.offset;

        if !correction.is_zero() {
            tracing::debug!(
                "resize clamp {:?} -> {:?} (content {:?}, viewport {:?})",
                self.offset,
                clamped,
                self.content,
                self.viewport
            );
            self.offset = clamped;
            self.dispatcher
                .dispatch(&ScrollEvent::offset_delta(correction, now_ms));
        }

        self.refresh_indicators();
    }

    fn refresh_indicators(&mut self) {
        for axis in Axis::ALL {
            let (content, viewport, offset) = (
                self.content.get(axis),
                self.viewport.get(axis),
                self.offset.get(axis),
            );
            self.indicators[axis].refresh(content, viewport, offset);
        }
    }

    // =========================================================================
    // Offset
    // =========================================================================

    /// Move the offset by `delta`, clamping each axis independently
    ///
    /// The applied part is reported through `OFFSET_CHANGED`, indicators are
    /// refreshed, and the excess is fed to the overscroll bounce, in that
    /// order. Axes locked out by the configured direction are dropped.
    pub fn apply_delta(&mut self, delta: Offset, now_ms: f64) -> DeltaSplit {
        let mut delta = delta;
        for axis in Axis::ALL {
            if !self.config.direction.allows(axis) {
                delta.set(axis, 0);
            }
        }
        self.move_by(delta, now_ms, true)
    }

    fn move_by(&mut self, delta: Offset, now_ms: f64, feed_bounce: bool) -> DeltaSplit {
        let before = self.offset;
        let max = self.max_offset();
        let mut split = DeltaSplit::default();

        for axis in Axis::ALL {
            if !self.scrollable(axis) {
                continue;
            }
            let current = self.offset.get(axis);
            let proposed = current.saturating_add(delta.get(axis));
            let clamped = proposed.clamp(0, max.get(axis));
            self.offset.set(axis, clamped);
            split.applied.set(axis, clamped - current);
            split.excess.set(axis, proposed - clamped);
        }

        if !split.applied.is_zero() {
            tracing::trace!(
                "offset {:?} -> {:?} (delta {:?}, excess {:?})",
                before,
                self.offset,
                delta,
                split.excess
            );
            self.dispatcher
                .dispatch(&ScrollEvent::offset_delta(split.applied, now_ms));
        }

        self.refresh_indicators();

        if feed_bounce && self.config.bounce.enabled {
            self.feed_bounce(split);
        }

        split
    }

    fn feed_bounce(&mut self, split: DeltaSplit) {
        for axis in Axis::ALL {
            let excess = split.excess.get(axis);
            let applied = split.applied.get(axis);

            if excess != 0 {
                self.bounce.add_excess(axis, excess as f32);
            } else if applied != 0 && !self.bounce.is_decaying() {
                // Moving away from a pushed edge relaxes it
                let pressure = self.bounce.pressure(axis);
                if pressure * (applied as f32) < 0.0 {
                    self.bounce.ease_off(axis, applied as f32);
                }
            }
        }
    }

    /// Jump to `target` through the clamp path, without overscroll feedback
    pub fn scroll_to(&mut self, target: Offset, now_ms: f64) -> DeltaSplit {
        if self.machine.is_in(ScrollState::Flinging) {
            self.settle(now_ms);
        }
        let split = self.move_by(target - self.offset, now_ms, false);
        if !split.applied.is_zero() && !self.machine.is_in(ScrollState::Dragging) {
            self.show_indicators(now_ms);
        }
        split
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Start a user interaction (pointer down)
    ///
    /// Catching a running fling continues the same interaction, so
    /// `INTERACTION_STARTED` is only sent when coming from idle.
    pub fn begin_interaction(&mut self, now_ms: f64) {
        let from = self.machine.current();
        if self.machine.send(event_types::POINTER_DOWN).is_none() {
            tracing::trace!("begin_interaction ignored in {:?}", from);
            return;
        }

        self.fling.cancel();
        self.bounce.cancel();
        self.sampler.reset();
        for axis in Axis::ALL {
            self.indicators[axis].hold();
        }

        if from == ScrollState::Idle {
            self.notify(event_types::INTERACTION_STARTED, now_ms);
        }
    }

    /// End a user interaction (pointer up), flinging if the release was fast
    pub fn end_interaction(&mut self, now_ms: f64) {
        self.finish_interaction(now_ms, true);
    }

    fn finish_interaction(&mut self, now_ms: f64, allow_fling: bool) {
        if !self.machine.is_in(ScrollState::Dragging) {
            return;
        }
        self.press = None;

        let mut velocity = if allow_fling {
            self.release_velocity(now_ms)
        } else {
            Vec2::ZERO
        };
        // Nothing to fling toward on an axis already against that bound
        for axis in Axis::ALL {
            if self.heads_into_bound(axis, velocity.get(axis)) {
                velocity.set(axis, 0.0);
            }
        }
        let flinging = self.fling.start(self.offset, velocity, now_ms);

        self.bounce.decay(now_ms);

        if flinging {
            self.machine.send(event_types::FLING_START);
            self.notify(event_types::FLING_STARTED, now_ms);
        } else {
            self.machine.send(event_types::POINTER_UP);
            self.release_indicators(now_ms);
            self.notify(event_types::INTERACTION_FINISHED, now_ms);
        }
    }

    /// Offset-space release velocity, restricted to axes that can move
    fn release_velocity(&self, now_ms: f64) -> Vec2 {
        let pointer = self.sampler.estimate(now_ms);
        let mut velocity = -pointer;
        if !self.responds(Axis::Horizontal) {
            velocity.x = 0.0;
        }
        if !self.responds(Axis::Vertical) {
            velocity.y = 0.0;
        }
        velocity
    }

    /// End the running fling and return to idle
    fn settle(&mut self, now_ms: f64) {
        self.fling.cancel();
        if self.machine.send(event_types::SETTLED).is_none() {
            return;
        }
        self.bounce.decay(now_ms);
        self.release_indicators(now_ms);
        self.notify(event_types::INTERACTION_FINISHED, now_ms);
    }

    /// Stop a running fling where it is
    pub fn stop(&mut self, now_ms: f64) {
        if self.machine.is_in(ScrollState::Flinging) {
            tracing::debug!("fling stopped at {:?}", self.offset);
            self.settle(now_ms);
        }
    }

    fn show_indicators(&mut self, now_ms: f64) {
        for axis in Axis::ALL {
            self.indicators[axis].show(now_ms);
        }
    }

    fn release_indicators(&mut self, now_ms: f64) {
        for axis in Axis::ALL {
            self.indicators[axis].release(now_ms);
        }
    }

    // =========================================================================
    // Pointer & Wheel Input
    // =========================================================================

    pub fn on_pointer_down(&mut self, position: Point, now_ms: f64) {
        self.begin_interaction(now_ms);
        if !self.machine.is_in(ScrollState::Dragging) {
            return;
        }
        self.press = Some(Press {
            origin: position,
            consumed: Offset::ZERO,
            dragging: false,
        });
        self.sampler.on_sample(position, now_ms);
    }

    /// Track the pointer; ignored while no press is active
    pub fn on_pointer_move(&mut self, position: Point, now_ms: f64) {
        let Some(mut press) = self.press else {
            return;
        };
        self.sampler.on_sample(position, now_ms);

        if !press.dragging {
            if position.distance_to(press.origin) < self.config.drag_start_distance {
                return;
            }
            tracing::debug!("drag recognised at {:?}", position);
            press.dragging = true;
        }

        // Content follows the finger: offset moves opposite to the pointer
        let total = Offset::round_from(-(position - press.origin));
        let step = total - press.consumed;
        press.consumed = total;
        self.press = Some(press);

        if !step.is_zero() {
            self.apply_delta(step, now_ms);
        }
    }

    pub fn on_pointer_up(&mut self, position: Point, now_ms: f64) {
        if self.press.is_none() {
            // Pointer up without a matching down
            return;
        }
        self.on_pointer_move(position, now_ms);
        let dragged = self.press.is_some_and(|p| p.dragging);
        self.finish_interaction(now_ms, dragged);
    }

    /// Apply a wheel delta (offset space)
    ///
    /// Stops a running fling. Pressure produced by the wheel decays right
    /// away since there is no release to wait for.
    pub fn on_wheel(&mut self, delta: Offset, now_ms: f64) {
        if self.machine.is_in(ScrollState::Flinging) {
            self.settle(now_ms);
        }

        self.apply_delta(delta, now_ms);

        if !self.machine.is_in(ScrollState::Dragging) {
            self.show_indicators(now_ms);
            self.bounce.decay(now_ms);
        }
    }

    // =========================================================================
    // Frame Tick
    // =========================================================================

    /// Advance all animations to `now_ms`
    ///
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if let Some(frame) = self.fling.tick(now_ms) {
            self.apply_delta(frame.delta, now_ms);

            if frame.finished || self.fling_pinned() {
                self.settle(now_ms);
            }
        }

        for axis in Axis::ALL {
            self.indicators[axis].tick(now_ms);
        }

        self.bounce.tick(now_ms);

        self.is_animating()
    }

    /// Whether `velocity` on `axis` points into the bound the offset rests on
    fn heads_into_bound(&self, axis: Axis, velocity: f32) -> bool {
        let offset = self.offset.get(axis);
        (velocity < 0.0 && offset == 0) || (velocity > 0.0 && offset == self.max_offset().get(axis))
    }

    /// Every moving axis of the fling sits at the bound it is heading to
    fn fling_pinned(&self) -> bool {
        let velocity = self.fling.velocity();

        let mut moving = false;
        for axis in Axis::ALL {
            let v = velocity.get(axis);
            if v == 0.0 {
                continue;
            }
            moving = true;
            if !self.heads_into_bound(axis, v) {
                return false;
            }
        }

        if moving {
            tracing::debug!("fling pinned at {:?}", self.offset);
        }
        moving
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_core::EventData;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller(content: (i32, i32), viewport: (i32, i32)) -> ScrollController {
        let mut c = ScrollController::default();
        c.set_sizes(
            Size::new(content.0, content.1),
            Size::new(viewport.0, viewport.1),
            0.0,
        );
        c
    }

    fn record(c: &mut ScrollController, event_type: EventType) -> Rc<RefCell<Vec<ScrollEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        c.on(event_type, move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn test_apply_delta_splits_at_bounds() {
        let mut c = controller((100, 1000), (100, 200));
        let split = c.apply_delta(Offset::new(0, 900), 0.0);
        assert_eq!(split.applied, Offset::new(0, 800));
        assert_eq!(split.excess, Offset::new(0, 100));
        assert_eq!(c.offset(), Offset::new(0, 800));

        let split = c.apply_delta(Offset::new(0, -850), 0.0);
        assert_eq!(split.applied, Offset::new(0, -800));
        assert_eq!(split.excess, Offset::new(0, -50));
        assert_eq!(c.offset(), Offset::ZERO);
    }

    #[test]
    fn test_axes_clamp_independently() {
        let mut c = controller((500, 1000), (200, 200));
        let split = c.apply_delta(Offset::new(-20, 300), 0.0);
        assert_eq!(split.applied, Offset::new(0, 300));
        assert_eq!(split.excess, Offset::new(-20, 0));
        assert!(c.bounce_pressure(Axis::Horizontal) < 0.0);
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_offset_changed_carries_applied_delta() {
        let mut c = controller((100, 1000), (100, 200));
        let log = record(&mut c, event_types::OFFSET_CHANGED);

        c.apply_delta(Offset::new(0, 30), 5.0);
        c.apply_delta(Offset::new(0, -100), 6.0);
        // Fully blocked: no notification
        c.apply_delta(Offset::new(0, -10), 7.0);

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, EventData::OffsetDelta { dx: 0, dy: 30 });
        assert_eq!(events[1].data, EventData::OffsetDelta { dx: 0, dy: -30 });
    }

    #[test]
    fn test_excess_feeds_bounce_after_offset() {
        let mut c = controller((100, 1000), (100, 200));
        c.apply_delta(Offset::new(0, -10), 0.0);
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.bounce_pressure(Axis::Vertical), -5.0);

        // Dragging back away from the edge relaxes the pressure
        c.apply_delta(Offset::new(0, 4), 0.0);
        assert_eq!(c.bounce_pressure(Axis::Vertical), -3.0);
        assert_eq!(c.offset(), Offset::new(0, 4));
    }

    #[test]
    fn test_no_bounce_config() {
        let mut c = ScrollController::new(ScrollConfig::no_bounce());
        c.set_sizes(Size::new(100, 1000), Size::new(100, 200), 0.0);
        c.apply_delta(Offset::new(0, -50), 0.0);
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_degenerate_sizes_disable_axis() {
        let mut c = controller((0, 1000), (100, 0));
        let split = c.apply_delta(Offset::new(30, 30), 0.0);
        assert_eq!(split, DeltaSplit::default());
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
        assert!(!c.indicator_geometry(Axis::Vertical).visible);
    }

    #[test]
    fn test_fitting_content_still_bounces() {
        let mut c = controller((100, 150), (100, 200));
        let split = c.apply_delta(Offset::new(0, 12), 0.0);
        assert_eq!(split.applied, Offset::ZERO);
        assert_eq!(split.excess, Offset::new(0, 12));
        assert_eq!(c.bounce_pressure(Axis::Vertical), 6.0);
    }

    #[test]
    fn test_direction_lock_drops_axis() {
        let config = ScrollConfig {
            direction: crate::config::ScrollDirection::Vertical,
            ..Default::default()
        };
        let mut c = ScrollController::new(config);
        c.set_sizes(Size::new(1000, 1000), Size::new(200, 200), 0.0);
        let split = c.apply_delta(Offset::new(50, 50), 0.0);
        assert_eq!(split.applied, Offset::new(0, 50));
        assert_eq!(c.offset(), Offset::new(0, 50));
    }

    #[test]
    fn test_resize_reclamps_and_reports() {
        let mut c = controller((100, 1000), (100, 200));
        c.apply_delta(Offset::new(0, 700), 0.0);
        let log = record(&mut c, event_types::OFFSET_CHANGED);

        c.set_content_size(Size::new(100, 500), 10.0);
        assert_eq!(c.offset(), Offset::new(0, 300));
        assert_eq!(
            log.borrow()[0].data,
            EventData::OffsetDelta { dx: 0, dy: -400 }
        );

        c.set_viewport_size(Size::new(100, 600), 20.0);
        assert_eq!(c.offset(), Offset::ZERO);
        assert!(!c.indicator_geometry(Axis::Vertical).visible);
        assert!(!c.is_animating());
    }

    #[test]
    fn test_tap_does_not_scroll() {
        let mut c = controller((100, 1000), (100, 200));
        c.on_pointer_down(Point::new(50.0, 100.0), 0.0);
        c.on_pointer_move(Point::new(50.0, 95.0), 20.0);
        c.on_pointer_up(Point::new(50.0, 94.0), 40.0);
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.state(), ScrollState::Idle);
        assert!(c.fling_target().is_none());
    }

    #[test]
    fn test_drag_tracks_pointer_from_press_point() {
        let mut c = controller((100, 1000), (100, 200));
        c.on_pointer_down(Point::new(50.0, 300.0), 0.0);
        c.on_pointer_move(Point::new(50.0, 285.0), 16.0);
        assert_eq!(c.offset(), Offset::new(0, 15));
        c.on_pointer_move(Point::new(50.0, 260.4), 32.0);
        assert_eq!(c.offset(), Offset::new(0, 40));
        c.on_pointer_move(Point::new(50.0, 280.0), 48.0);
        assert_eq!(c.offset(), Offset::new(0, 20));
    }

    #[test]
    fn test_interaction_events() {
        let mut c = controller((100, 1000), (100, 200));
        let started = record(&mut c, event_types::INTERACTION_STARTED);
        let finished = record(&mut c, event_types::INTERACTION_FINISHED);
        let flinged = record(&mut c, event_types::FLING_STARTED);

        // Fast upward swipe
        c.on_pointer_down(Point::new(0.0, 400.0), 0.0);
        c.on_pointer_move(Point::new(0.0, 380.0), 16.0);
        c.on_pointer_move(Point::new(0.0, 350.0), 32.0);
        c.on_pointer_up(Point::new(0.0, 320.0), 48.0);
        assert_eq!(c.state(), ScrollState::Flinging);
        assert_eq!(started.borrow().len(), 1);
        assert_eq!(flinged.borrow().len(), 1);
        assert!(finished.borrow().is_empty());

        // Catching the fling is the same interaction
        c.on_pointer_down(Point::new(0.0, 320.0), 60.0);
        assert_eq!(c.state(), ScrollState::Dragging);
        assert_eq!(started.borrow().len(), 1);

        c.on_pointer_up(Point::new(0.0, 320.0), 400.0);
        assert_eq!(c.state(), ScrollState::Idle);
        assert_eq!(finished.borrow().len(), 1);
    }

    #[test]
    fn test_fling_runs_to_rest() {
        let mut c = controller((100, 100_000), (100, 200));
        c.on_pointer_down(Point::new(0.0, 400.0), 0.0);
        c.on_pointer_move(Point::new(0.0, 380.0), 10.0);
        c.on_pointer_up(Point::new(0.0, 360.0), 20.0);

        // 2000 px/s upward pointer motion -> content flings forward
        let target = c.fling_target().unwrap();
        let released_at = c.offset();
        assert_eq!(target.y - released_at.y, 6000);

        let mut now = 20.0;
        while c.tick(now) {
            now += 16.0;
        }
        assert_eq!(c.offset(), target);
        assert_eq!(c.state(), ScrollState::Idle);
    }

    #[test]
    fn test_fling_pinned_at_bound_ends_early() {
        let mut c = controller((100, 1000), (100, 200));
        c.apply_delta(Offset::new(0, 700), 0.0);
        let finished = record(&mut c, event_types::INTERACTION_FINISHED);

        c.on_pointer_down(Point::new(0.0, 400.0), 100.0);
        c.on_pointer_move(Point::new(0.0, 370.0), 110.0);
        c.on_pointer_up(Point::new(0.0, 340.0), 120.0);
        assert_eq!(c.state(), ScrollState::Flinging);

        let mut now = 120.0;
        while c.state() == ScrollState::Flinging {
            now += 16.0;
            c.tick(now);
        }
        assert!(now < 1000.0, "fling should end at the bound, ended at {}", now);
        assert_eq!(c.offset(), Offset::new(0, 800));
        assert_eq!(finished.borrow().len(), 1);
        assert!(c.bounce_pressure(Axis::Vertical) > 0.0);

        while c.tick(now) {
            now += 16.0;
        }
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_stop_settles_fling() {
        let mut c = controller((100, 100_000), (100, 200));
        c.on_pointer_down(Point::new(0.0, 400.0), 0.0);
        c.on_pointer_move(Point::new(0.0, 380.0), 10.0);
        c.on_pointer_up(Point::new(0.0, 360.0), 20.0);
        c.tick(100.0);
        let at = c.offset();

        c.stop(110.0);
        c.stop(120.0);
        assert_eq!(c.state(), ScrollState::Idle);
        c.tick(500.0);
        assert_eq!(c.offset(), at);
    }

    #[test]
    fn test_wheel_cancels_fling_and_decays_pressure() {
        let mut c = controller((100, 100_000), (100, 200));
        c.on_pointer_down(Point::new(0.0, 400.0), 0.0);
        c.on_pointer_move(Point::new(0.0, 380.0), 10.0);
        c.on_pointer_up(Point::new(0.0, 360.0), 20.0);
        assert_eq!(c.state(), ScrollState::Flinging);

        c.on_wheel(Offset::new(0, -10), 30.0);
        assert_eq!(c.state(), ScrollState::Idle);
        assert!(c.fling_target().is_none());

        let mut w = controller((100, 1000), (100, 200));
        w.on_wheel(Offset::new(0, -30), 0.0);
        assert!(w.bounce_pressure(Axis::Vertical) < 0.0);
        assert_eq!(w.indicator_alpha(Axis::Vertical), 1.0);
        let mut now = 0.0;
        while w.tick(now) {
            now += 16.0;
        }
        assert_eq!(w.bounce_pressure(Axis::Vertical), 0.0);
        assert_eq!(w.indicator_alpha(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_scroll_to_clamps_without_bounce() {
        let mut c = controller((100, 1000), (100, 200));
        let split = c.scroll_to(Offset::new(0, 5000), 0.0);
        assert_eq!(split.applied, Offset::new(0, 800));
        assert_eq!(c.offset(), Offset::new(0, 800));
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_handler_removal() {
        let mut c = controller((100, 1000), (100, 200));
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = c.on(event_types::OFFSET_CHANGED, move |_| *sink.borrow_mut() += 1);

        c.apply_delta(Offset::new(0, 10), 0.0);
        assert!(c.off(id));
        assert!(!c.off(id));
        c.apply_delta(Offset::new(0, 10), 0.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_with_dispatcher() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let dispatcher = EventDispatcher::new()
            .with(event_types::INTERACTION_STARTED, move |_| *sink.borrow_mut() += 1);

        let mut c = ScrollController::with_dispatcher(ScrollConfig::default(), dispatcher);
        c.begin_interaction(0.0);
        c.end_interaction(10.0);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(c.state(), ScrollState::Idle);
    }

    #[test]
    fn test_release_against_bound_does_not_fling() {
        let mut c = controller((100, 1000), (100, 200));
        c.apply_delta(Offset::new(0, 800), 0.0);
        let flings = record(&mut c, event_types::FLING_STARTED);
        let finished = record(&mut c, event_types::INTERACTION_FINISHED);

        // Fast upward flick while already at the end
        c.on_pointer_down(Point::new(0.0, 400.0), 1000.0);
        c.on_pointer_move(Point::new(0.0, 370.0), 1010.0);
        c.on_pointer_up(Point::new(0.0, 340.0), 1020.0);

        assert!(flings.borrow().is_empty());
        assert_eq!(finished.borrow().len(), 1);
        assert_eq!(finished.borrow()[0].timestamp_ms, 1020.0);
        assert_eq!(c.state(), ScrollState::Idle);
        assert_eq!(c.offset(), Offset::new(0, 800));
        assert!(c.fling_target().is_none());

        // The push still registers as overscroll and decays
        assert!(c.bounce_pressure(Axis::Vertical) > 0.0);
        let mut now = 1020.0;
        while c.tick(now) {
            now += 16.0;
        }
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_release_at_one_bound_flings_the_other_axis() {
        let mut c = controller((1000, 1000), (200, 200));
        c.apply_delta(Offset::new(0, 800), 0.0);

        c.on_pointer_down(Point::new(400.0, 400.0), 1000.0);
        c.on_pointer_move(Point::new(370.0, 370.0), 1010.0);
        c.on_pointer_up(Point::new(340.0, 340.0), 1020.0);

        assert_eq!(c.state(), ScrollState::Flinging);
        let target = c.fling_target().unwrap();
        assert!(target.x > c.offset().x);
        assert_eq!(target.y, 800);
    }

    #[test]
    fn test_set_config_mid_drag_keeps_velocity() {
        let mut c = controller((100, 10_000), (100, 200));
        c.on_pointer_down(Point::new(0.0, 400.0), 0.0);
        c.on_pointer_move(Point::new(0.0, 370.0), 10.0);
        c.on_pointer_move(Point::new(0.0, 340.0), 20.0);

        c.set_config(ScrollConfig::default());
        c.on_pointer_up(Point::new(0.0, 340.0), 20.0);

        assert_eq!(c.state(), ScrollState::Flinging);
    }

    #[test]
    fn test_set_config_during_bounce_decay() {
        let mut c = controller((100, 1000), (100, 200));
        c.on_wheel(Offset::new(0, -60), 0.0);
        assert_eq!(c.bounce_pressure(Axis::Vertical), -20.0);

        c.tick(150.0);
        let mid = c.bounce_pressure(Axis::Vertical);
        assert!(mid < 0.0 && mid > -20.0);

        let mut config = ScrollConfig::default();
        config.bounce.max_pressure = 1.0;
        config.bounce.easing = flick_animation::Easing::EaseInCirc;
        c.set_config(config);
        assert_eq!(c.config().bounce.max_pressure, 1.0);
        assert_eq!(c.bounce_pressure(Axis::Vertical), -1.0);

        let mut previous = 1.0f32;
        let mut now = 160.0;
        while c.tick(now) {
            let magnitude = c.bounce_pressure(Axis::Vertical).abs();
            assert!(magnitude <= 1.0, "pressure {} above new max", magnitude);
            assert!(magnitude <= previous);
            previous = magnitude;
            now += 10.0;
        }
        assert_eq!(c.bounce_pressure(Axis::Vertical), 0.0);
    }
}
