use std::collections::VecDeque;
use std::time::Duration;

const HISTORY_LIMIT: Duration = Duration::from_millis(150);

/// Release velocity in logical pixels per second above which a release counts as a fling.
pub const FLING_VELOCITY: f64 = 1000.;

/// Tracks recent finger movement to estimate velocity.
///
/// The engine itself only consumes [`GestureSignal`](super::GestureSignal)s; this is for callers
/// that only see raw positions and need to derive velocity and fling classification themselves.
#[derive(Debug)]
pub struct SwipeTracker {
    history: VecDeque<Event>,
    pos: f64,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    delta: f64,
    timestamp: Duration,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            pos: 0.,
        }
    }

    /// Pushes a new reading into the tracker.
    pub fn push(&mut self, delta: f64, timestamp: Duration) {
        // For the events that we care about, timestamps should always increase
        // monotonically.
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                trace!(
                    "ignoring event with timestamp {timestamp:?} earlier than last {:?}",
                    last.timestamp
                );
                return;
            }
        }

        self.history.push_back(Event { delta, timestamp });
        self.pos += delta;

        self.trim_history();
    }

    /// Returns the current gesture position.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// Computes the current gesture velocity in units per second.
    pub fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.;
        };

        let total_time = (last.timestamp - first.timestamp).as_secs_f64();
        if total_time == 0. {
            return 0.;
        }

        let total_delta = self.history.iter().map(|event| event.delta).sum::<f64>();
        total_delta / total_time
    }

    /// Returns whether releasing now would be a fling.
    pub fn is_fling(&self) -> bool {
        self.velocity().abs() > FLING_VELOCITY
    }

    fn trim_history(&mut self) {
        let Some(&Event { timestamp, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if timestamp <= first.timestamp + HISTORY_LIMIT {
                break;
            }

            let _ = self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn velocity_over_history() {
        let mut tracker = SwipeTracker::new();
        tracker.push(0., Duration::ZERO);
        tracker.push(-5., Duration::from_millis(10));
        tracker.push(-5., Duration::from_millis(20));

        assert_abs_diff_eq!(tracker.pos(), -10.);
        assert_abs_diff_eq!(tracker.velocity(), -500., epsilon = 1e-6);
        assert!(!tracker.is_fling());

        tracker.push(-40., Duration::from_millis(30));
        assert!(tracker.is_fling());
    }

    #[test]
    fn old_events_are_forgotten() {
        let mut tracker = SwipeTracker::new();
        tracker.push(-100., Duration::ZERO);
        tracker.push(0., Duration::from_millis(500));
        tracker.push(0., Duration::from_millis(510));

        assert_abs_diff_eq!(tracker.pos(), -100.);
        assert_eq!(tracker.velocity(), 0.);
    }

    #[test]
    fn out_of_order_event_is_ignored() {
        let mut tracker = SwipeTracker::new();
        tracker.push(5., Duration::from_millis(20));
        tracker.push(5., Duration::from_millis(10));
        assert_eq!(tracker.pos(), 5.);
    }
}
