//! Interpolation curves.

use std::time::Duration;

use keyframe::functions::{EaseInQuad, EaseOutCubic, EaseOutQuad};
use keyframe::EasingFunction;

/// Overshoot tension is capped here, otherwise very fast flings bounce absurdly far.
const MAX_OVERSHOOT_TENSION: f64 = 3.;

const FAST_FLING_PX_PER_MS: f64 = 10.;

/// Overshoot past the target by roughly half a frame worth of travel.
const OVERSHOOT_FACTOR: f64 = 0.9;
const SINGLE_FRAME_MS: f64 = 16.;
const MIN_OVERSHOOT_PROGRESS: f64 = 0.02;
const MAX_OVERSHOOT_PROGRESS: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutExpo,
    /// Goes past 1 and settles back; higher tension overshoots further.
    Overshoot { tension: f64 },
}

impl Curve {
    pub fn y(self, x: f64) -> f64 {
        match self {
            Curve::Linear => x,
            Curve::EaseInQuad => EaseInQuad.y(x),
            Curve::EaseOutQuad => EaseOutQuad.y(x),
            Curve::EaseOutCubic => EaseOutCubic.y(x),
            Curve::EaseOutExpo => 1. - 2f64.powf(-10. * x),
            Curve::Overshoot { tension } => {
                let t = x - 1.;
                t * t * ((tension + 1.) * t + tension) + 1.
            }
        }
    }

    /// Overshoot curve whose bounce grows with the release velocity, in pixels per millisecond.
    pub fn overshoot_for_velocity(velocity_px_per_ms: f64) -> Self {
        Curve::Overshoot {
            tension: velocity_px_per_ms.abs().min(MAX_OVERSHOOT_TENSION),
        }
    }

    /// Settle curve for a release at the given velocity, in pixels per millisecond.
    ///
    /// Fast releases decelerate sharply, slower ones more gently.
    pub fn settle_for_velocity(velocity_px_per_ms: f64) -> Self {
        if velocity_px_per_ms.abs() > FAST_FLING_PX_PER_MS {
            Curve::EaseOutExpo
        } else {
            Curve::EaseOutCubic
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::EaseInQuad => "ease-in-quad",
            Curve::EaseOutQuad => "ease-out-quad",
            Curve::EaseOutCubic => "ease-out-cubic",
            Curve::EaseOutExpo => "ease-out-expo",
            Curve::Overshoot { .. } => "overshoot",
        }
    }
}

/// A curve that only runs within a sub-range of the overall progress.
///
/// Before `start` it stays at 0, after `end` it stays at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedCurve {
    pub curve: Curve,
    pub start: f64,
    pub end: f64,
}

impl ClampedCurve {
    pub fn new(curve: Curve, start: f64, end: f64) -> Self {
        Self { curve, start, end }
    }

    /// Runs over the whole progress range.
    pub fn full(curve: Curve) -> Self {
        Self::new(curve, 0., 1.)
    }

    pub fn y(&self, x: f64) -> f64 {
        if x < self.start {
            0.
        } else if x >= self.end {
            1.
        } else {
            self.curve.y((x - self.start) / (self.end - self.start))
        }
    }
}

/// Extra settle time and curve for a spring-like overshoot at the end of a swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overshoot {
    pub curve: Curve,
    /// Time to decelerate from the release velocity to the overshoot peak.
    pub duration: Duration,
    /// How far past the end the animation swings, in progress units.
    pub overshoot_by: f64,
}

impl Overshoot {
    pub fn new(velocity_px_per_ms: f64, total_distance: f64) -> Self {
        let velocity = velocity_px_per_ms.abs();
        let total_distance = total_distance.abs().max(1.);

        let overshoot_by = OVERSHOOT_FACTOR * velocity * SINGLE_FRAME_MS / total_distance / 2.;
        let overshoot_by = overshoot_by.clamp(MIN_OVERSHOOT_PROGRESS, MAX_OVERSHOOT_PROGRESS);

        // v^2 = 2ad, and the time to stop is t = v / a = 2d / v.
        let overshoot_distance = overshoot_by * total_distance;
        let duration = if velocity > f64::EPSILON {
            Duration::from_secs_f64(2. * overshoot_distance / velocity / 1000.)
        } else {
            Duration::ZERO
        };

        Self {
            curve: Curve::overshoot_for_velocity(velocity),
            duration,
            overshoot_by,
        }
    }
}
