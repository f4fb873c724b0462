use std::fmt;
use std::time::Duration;

use super::plan::AnimatorPlan;
use crate::animation::{Animation, Clock, Curve};

/// Callback fired once a timed run reaches its target, with the final fraction.
pub type OnDone = Box<dyn FnOnce(f64)>;

/// A transition animation whose play position is either set directly from input or handed off
/// to a timed run.
pub struct AnimationProgressController {
    plan: AnimatorPlan,
    clock: Clock,
    allow_overscroll: bool,
    fraction: f64,
    phase: ProgressPhase,
}

enum ProgressPhase {
    Scrubbing,
    Running {
        anim: Animation,
        on_done: Option<OnDone>,
    },
    Finished,
    Cancelled,
}

impl AnimationProgressController {
    pub fn new(plan: AnimatorPlan, clock: Clock, start_fraction: f64) -> Self {
        Self {
            plan,
            clock,
            allow_overscroll: false,
            fraction: start_fraction.clamp(0., 1.),
            phase: ProgressPhase::Scrubbing,
        }
    }

    /// Lets scrubbing move the fraction outside of [0, 1].
    pub fn with_overscroll(mut self, allow_overscroll: bool) -> Self {
        self.allow_overscroll = allow_overscroll;
        self
    }

    pub fn plan(&self) -> &AnimatorPlan {
        &self.plan
    }

    /// Sets the play position from input.
    ///
    /// Only valid while scrubbing; once a timed run started, this is ignored.
    pub fn set_progress(&mut self, fraction: f64) {
        if !matches!(self.phase, ProgressPhase::Scrubbing) {
            warn!("ignoring set_progress({fraction}) outside of scrubbing");
            return;
        }

        self.fraction = if self.allow_overscroll {
            fraction
        } else {
            fraction.clamp(0., 1.)
        };
    }

    pub fn current_fraction(&self) -> f64 {
        match &self.phase {
            ProgressPhase::Running { anim, .. } => anim.value(),
            _ => self.fraction,
        }
    }

    /// Hands the position off to a timed run towards `target`.
    ///
    /// `on_done` fires exactly once when the run reaches `target`; right away if `duration` is
    /// zero. Returns `true` if the run finished immediately.
    pub fn run_to_completion(
        &mut self,
        target: f64,
        duration: Duration,
        curve: Curve,
        on_done: Option<OnDone>,
    ) -> bool {
        if !matches!(self.phase, ProgressPhase::Scrubbing) {
            warn!("ignoring run_to_completion({target}) outside of scrubbing");
            return false;
        }

        let anim = Animation::new(self.clock.clone(), self.fraction, target, duration, curve);
        trace!(
            "running from {:.3} to {target} over {:?} with {}",
            self.fraction,
            anim.duration(),
            curve.name()
        );

        self.phase = ProgressPhase::Running { anim, on_done };
        self.advance_animations()
    }

    /// Moves a timed run forward to the current clock time.
    ///
    /// Returns `true` exactly once, on the call where the run finishes.
    pub fn advance_animations(&mut self) -> bool {
        let ProgressPhase::Running { anim, .. } = &self.phase else {
            return false;
        };

        if !anim.is_done() {
            return false;
        }

        self.finish()
    }

    /// Jumps a timed run to its end and finishes it.
    pub fn end_now(&mut self) -> bool {
        if !matches!(self.phase, ProgressPhase::Running { .. }) {
            return false;
        }

        self.finish()
    }

    /// Freezes the position and stops the animation for good without firing `on_done`.
    pub fn cancel(&mut self) {
        self.fraction = self.current_fraction();
        self.phase = ProgressPhase::Cancelled;
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self.phase, ProgressPhase::Scrubbing)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ProgressPhase::Running { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, ProgressPhase::Finished)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.phase, ProgressPhase::Cancelled)
    }

    fn finish(&mut self) -> bool {
        let (anim, on_done) = match std::mem::replace(&mut self.phase, ProgressPhase::Finished) {
            ProgressPhase::Running { anim, on_done } => (anim, on_done),
            phase => {
                self.phase = phase;
                return false;
            }
        };

        self.fraction = anim.to();
        if let Some(on_done) = on_done {
            on_done(self.fraction);
        }
        true
    }
}

impl fmt::Debug for AnimationProgressController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            ProgressPhase::Scrubbing => "scrubbing",
            ProgressPhase::Running { .. } => "running",
            ProgressPhase::Finished => "finished",
            ProgressPhase::Cancelled => "cancelled",
        };

        f.debug_struct("AnimationProgressController")
            .field("plan", &self.plan)
            .field("fraction", &self.current_fraction())
            .field("phase", &phase)
            .finish()
    }
}
