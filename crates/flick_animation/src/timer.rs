//! Repeating timers driven by host timestamps

/// A timer that fires every `interval_ms` after an initial delay
///
/// The timer never calls back on its own: the owner polls it with the current
/// time and gets the number of intervals that elapsed since the last poll.
#[derive(Clone, Debug)]
pub struct RepeatingTimer {
    interval_ms: f64,
    /// Time of the next pending fire, None when stopped
    next_fire_ms: Option<f64>,
}

impl RepeatingTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_fire_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    /// Arm the timer; the first fire happens `initial_delay_ms` after `now_ms`.
    /// Restarting an armed timer discards its pending schedule.
    pub fn start(&mut self, now_ms: f64, initial_delay_ms: f64) {
        self.next_fire_ms = Some(now_ms + initial_delay_ms.max(0.0));
    }

    /// Disarm the timer. Leaves no pending fire; safe to call when stopped.
    pub fn stop(&mut self) {
        self.next_fire_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    pub fn next_fire_ms(&self) -> Option<f64> {
        self.next_fire_ms
    }

    /// Consume one due fire, if any.
    ///
    /// Call in a loop to catch up on every interval that elapsed; the owner
    /// may `stop()` between fires to discard the rest.
    pub fn poll_once(&mut self, now_ms: f64) -> bool {
        match self.next_fire_ms {
            Some(next) if next <= now_ms => {
                self.next_fire_ms = if self.interval_ms > 0.0 {
                    Some(next + self.interval_ms)
                } else {
                    // A non-positive interval cannot repeat
                    None
                };
                true
            }
            _ => false,
        }
    }

    /// Count all fires due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let mut fired = 0;
        while self.poll_once(now_ms) {
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_delay_then_interval() {
        let mut timer = RepeatingTimer::new(50.0);
        timer.start(0.0, 600.0);

        assert_eq!(timer.poll(599.0), 0);
        assert_eq!(timer.poll(600.0), 1);
        assert_eq!(timer.poll(649.0), 0);
        assert_eq!(timer.poll(650.0), 1);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let mut timer = RepeatingTimer::new(10.0);
        timer.start(0.0, 0.0);
        assert_eq!(timer.poll(35.0), 4); // 0, 10, 20, 30
        assert_eq!(timer.next_fire_ms(), Some(40.0));
    }

    #[test]
    fn test_restart_discards_schedule() {
        let mut timer = RepeatingTimer::new(10.0);
        timer.start(0.0, 100.0);
        timer.start(50.0, 100.0);
        assert_eq!(timer.poll(120.0), 0);
        assert_eq!(timer.poll(150.0), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = RepeatingTimer::new(10.0);
        timer.stop();
        timer.start(0.0, 0.0);
        timer.stop();
        timer.stop();
        assert!(!timer.is_active());
        assert_eq!(timer.poll(1000.0), 0);
    }

    #[test]
    fn test_non_positive_interval_fires_once() {
        let mut timer = RepeatingTimer::new(0.0);
        timer.start(0.0, 5.0);
        assert_eq!(timer.poll(100.0), 1);
        assert!(!timer.is_active());
    }
}
