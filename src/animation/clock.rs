use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Shared animation clock.
///
/// The engine never reads the system time. Whoever drives frames (the UI toolkit, the replay
/// tool, a test) pushes the frame time in with [`Clock::set_unadjusted`], and every
/// [`Animation`](super::Animation) created from a clone of this clock sees the same time.
///
/// The adjusted time runs at `rate` relative to the unadjusted time, which is how the animation
/// slowdown setting is applied.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    inner: Rc<RefCell<AdjustableClock>>,
}

#[derive(Debug)]
struct AdjustableClock {
    unadjusted: Duration,
    adjusted: Duration,
    rate: f64,
    complete_instantly: bool,
}

impl Default for AdjustableClock {
    fn default() -> Self {
        Self {
            unadjusted: Duration::ZERO,
            adjusted: Duration::ZERO,
            rate: 1.,
            complete_instantly: false,
        }
    }
}

impl Clock {
    /// Creates a new clock starting at `time`.
    pub fn with_time(time: Duration) -> Self {
        let clock = AdjustableClock {
            unadjusted: time,
            adjusted: time,
            ..Default::default()
        };
        Self {
            inner: Rc::new(RefCell::new(clock)),
        }
    }

    /// Returns the current adjusted time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().adjusted
    }

    /// Returns the current unadjusted time.
    ///
    /// Gesture timing (such as the fling block window) uses this, since slowing down animations
    /// must not change how fast the user's finger moves.
    pub fn now_unadjusted(&self) -> Duration {
        self.inner.borrow().unadjusted
    }

    /// Advances the clock to `time`.
    ///
    /// Times earlier than the current one are ignored.
    pub fn set_unadjusted(&mut self, time: Duration) {
        let mut inner = self.inner.borrow_mut();
        if time <= inner.unadjusted {
            return;
        }

        let delta = time - inner.unadjusted;
        let rate = inner.rate;
        inner.unadjusted = time;
        inner.adjusted += if rate == 1. {
            delta
        } else {
            delta.mul_f64(rate)
        };
    }

    /// Sets the rate at which the adjusted time flows.
    pub fn set_rate(&mut self, rate: f64) {
        let rate = if rate.is_finite() { rate.max(0.) } else { 1. };
        self.inner.borrow_mut().rate = rate;
    }

    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate
    }

    /// Returns whether animations should complete instantly.
    pub fn should_complete_instantly(&self) -> bool {
        self.inner.borrow().complete_instantly
    }

    pub fn set_complete_instantly(&mut self, value: bool) {
        self.inner.borrow_mut().complete_instantly = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let mut clock = Clock::with_time(Duration::from_millis(5));
        let other = clock.clone();

        clock.set_unadjusted(Duration::from_millis(21));
        assert_eq!(other.now(), Duration::from_millis(21));
        assert_eq!(other.now_unadjusted(), Duration::from_millis(21));
    }

    #[test]
    fn rate_slows_adjusted_time() {
        let mut clock = Clock::with_time(Duration::ZERO);
        clock.set_rate(0.5);

        clock.set_unadjusted(Duration::from_millis(100));
        assert_eq!(clock.now_unadjusted(), Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(50));
    }

    #[test]
    fn time_never_goes_back() {
        let mut clock = Clock::with_time(Duration::from_millis(100));
        clock.set_unadjusted(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }
}
