//! Deciding how a transition completes once the finger lifts.

use std::time::Duration;

use swipestate_config::Gestures;

use crate::animation::{Curve, Overshoot};
use crate::state::UiState;

/// Timing constants for completing a swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Longest a settle may take.
    pub max_swipe_duration: Duration,
    /// Shortest settle that still shows an overshoot.
    pub min_overshoot_duration: Duration,
    /// Duration cap for the overshoot at the end of a first swipe into the overview.
    pub atomic_duration: Duration,
    /// Releases slower than this, in logical pixels per second, settle at position-based speed
    /// even when flung.
    pub min_fling_velocity: f64,
    /// Fraction past which a release without a fling completes the transition.
    pub threshold: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::from(&Gestures::default())
    }
}

impl From<&Gestures> for PlannerConfig {
    fn from(config: &Gestures) -> Self {
        Self {
            max_swipe_duration: Duration::from_millis(u64::from(config.max_swipe_duration_ms)),
            min_overshoot_duration: Duration::from_millis(u64::from(
                config.min_overshoot_duration_ms,
            )),
            atomic_duration: Duration::from_millis(u64::from(config.atomic_duration_ms)),
            min_fling_velocity: config.min_fling_velocity.0,
            threshold: config.swipe_threshold.0,
        }
    }
}

impl PlannerConfig {
    /// Compensates for the two ends of the range being unequally far from the threshold.
    fn duration_multiplier(&self) -> f64 {
        (1. / self.threshold).min(1. / (1. - self.threshold))
    }
}

/// Everything known about the gesture at the moment the finger lifted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionInputs {
    pub current_fraction: f64,
    /// Release velocity along the tracked axis, in logical pixels per second.
    pub velocity: f64,
    pub is_fling: bool,
    /// Whether the fling block window was still open at release.
    pub fling_blocked: bool,
    pub from_state: UiState,
    pub to_state: UiState,
    /// Signed displacement that maps to fraction 1. May be zero.
    pub travel_distance: f64,
    /// Replaces a zero travel distance.
    pub fallback_distance: f64,
    /// Blocked flings settling anywhere but here overshoot.
    pub away_state: UiState,
    /// Whether a valid fling reaching `to_state` overshoots.
    pub overshoot_on_fling: bool,
}

/// How the settle animation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionPlan {
    pub target_state: UiState,
    pub duration: Duration,
    pub curve: Curve,
    pub start_progress: f64,
    pub end_progress: f64,
    /// Whether the release counted as a fling, after the fling block.
    pub is_fling: bool,
    pub overshoot: Option<Overshoot>,
}

/// Computes the completion plan for a release.
pub fn plan(inputs: &CompletionInputs, config: &PlannerConfig) -> CompletionPlan {
    let CompletionInputs {
        current_fraction,
        velocity,
        from_state,
        to_state,
        ..
    } = *inputs;

    let velocity_px_per_ms = velocity / 1000.;
    let max_swipe_ms = duration_ms(config.max_swipe_duration);

    let blocked_fling = inputs.is_fling && inputs.fling_blocked;
    let is_fling = inputs.is_fling && !blocked_fling;

    let degenerate = from_state == to_state || inputs.travel_distance == 0.;
    let travel_distance = if inputs.travel_distance == 0. {
        inputs.fallback_distance
    } else {
        inputs.travel_distance
    };

    let reaches_to = if is_fling {
        velocity != 0. && velocity.signum() == travel_distance.signum()
    } else {
        current_fraction >= config.threshold
    };
    let target_state = if reaches_to { to_state } else { from_state };
    let end_progress = if reaches_to { 1. } else { 0. };

    let position_based_ms = || {
        let expected =
            (end_progress - current_fraction).abs() * max_swipe_ms * config.duration_multiplier();
        expected.min(max_swipe_ms)
    };

    let mut curve = Curve::settle_for_velocity(velocity_px_per_ms);
    let mut overshoot = None;

    let duration = if degenerate {
        let fallback = travel_distance.abs().max(1.);
        let speed = velocity.abs().max(config.min_fling_velocity).max(1.);
        let ms = 2. * fallback / speed * 1000.;
        clamp_ms(
            ms,
            duration_ms(config.min_overshoot_duration),
            max_swipe_ms,
        )
    } else if !is_fling {
        let mut ms = position_based_ms();

        if blocked_fling && target_state != inputs.away_state {
            // Overshoot to signal that the speed of the release was noticed.
            let params = Overshoot::new(velocity_px_per_ms, travel_distance);
            ms = clamp_ms(
                ms + duration_ms(params.duration),
                duration_ms(config.min_overshoot_duration),
                max_swipe_ms,
            );
            curve = params.curve;
            overshoot = Some(params);
        }

        ms
    } else {
        let mut ms = if velocity.abs() > config.min_fling_velocity {
            let distance_to_travel = (end_progress - current_fraction) * travel_distance;
            // A settle curve starts at roughly twice the average speed, so twice the time at
            // release speed matches the finger.
            (2. * (distance_to_travel / velocity_px_per_ms).abs()).min(max_swipe_ms)
        } else {
            position_based_ms()
        };

        if inputs.overshoot_on_fling && reaches_to && ms > 0. {
            let params = Overshoot::new(velocity_px_per_ms, travel_distance);
            ms = ms.min(duration_ms(config.atomic_duration));
            curve = params.curve;
            overshoot = Some(params);
        }

        ms
    };

    CompletionPlan {
        target_state,
        duration: from_ms(finite_or(duration, max_swipe_ms)),
        curve,
        start_progress: current_fraction,
        end_progress,
        is_fling,
        overshoot,
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.
}

/// Rounds to whole microseconds so that durations computed from the config round-trip exactly.
fn from_ms(ms: f64) -> Duration {
    Duration::from_micros((ms * 1000.).round() as u64)
}

fn clamp_ms(ms: f64, min: f64, max: f64) -> f64 {
    ms.max(min).min(max)
}

fn finite_or(ms: f64, fallback: f64) -> f64 {
    if ms.is_finite() && ms >= 0. {
        ms
    } else {
        fallback
    }
}
