use std::time::Duration;

mod clock;
mod curve;

pub use self::clock::Clock;
pub use self::curve::{ClampedCurve, Curve, Overshoot};

/// A value eased from one number to another over a fixed duration.
#[derive(Debug, Clone)]
pub struct Animation {
    from: f64,
    to: f64,
    duration: Duration,
    curve: Curve,
    start_time: Duration,
    clock: Clock,
}

impl Animation {
    pub fn new(clock: Clock, from: f64, to: f64, duration: Duration, curve: Curve) -> Self {
        let duration = if clock.should_complete_instantly() {
            Duration::ZERO
        } else {
            duration
        };

        Self {
            from,
            to,
            duration,
            curve,
            start_time: clock.now(),
            clock,
        }
    }

    pub fn is_done(&self) -> bool {
        self.clock.now() >= self.start_time + self.duration
    }

    /// Returns the linear time progress in [0, 1].
    pub fn linear_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.;
        }

        let passed = self.clock.now().saturating_sub(self.start_time);
        (passed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0., 1.)
    }

    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }

        let t = self.curve.y(self.linear_progress());
        self.from + (self.to - self.from) * t
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }
}
