use super::completion::CompletionPlan;
use super::plan::ItemId;
use super::progress::AnimationProgressController;
use crate::input::FlingBlockCheck;
use crate::state::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The finger is down and scrubbing the transition.
    Dragging,
    /// The finger lifted and the transition runs to its target.
    Settling,
}

/// One transition between two states, from the first movement until it commits or is cancelled.
#[derive(Debug)]
pub struct TransitionSession {
    pub from_state: UiState,
    pub to_state: UiState,
    /// Committed state when the gesture began.
    pub start_state: UiState,
    pub progress: AnimationProgressController,
    /// Item launch that replaces the state animation, finished when the session ends.
    pub pending_launch: Option<ItemId>,
    pub finish_fast_on_next_touch: bool,
    /// Signed displacement from `from_state` to `to_state`; zero for a degenerate pair.
    pub travel_distance: f64,
    /// Signed displacement that maps to fraction 1 while scrubbing. Never zero.
    pub scrub_distance: f64,
    /// Fraction the session started at; non-zero when it caught a settling transition.
    pub start_fraction: f64,
    pub fling_block: FlingBlockCheck,
    pub phase: Phase,
    /// How the session settles, once released.
    pub plan: Option<CompletionPlan>,
}

impl TransitionSession {
    /// Fraction for a displacement measured from where the touch went down.
    pub fn fraction_for(&self, displacement: f64) -> f64 {
        self.start_fraction + displacement / self.scrub_distance
    }

    pub fn is_settling(&self) -> bool {
        self.phase == Phase::Settling
    }
}

/// What survives of a settling session that a new touch caught.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaughtTransition {
    pub from_state: UiState,
    pub to_state: UiState,
    pub start_state: UiState,
    pub fraction: f64,
}

impl CaughtTransition {
    pub fn from_session(session: &TransitionSession) -> Self {
        Self {
            from_state: session.from_state,
            to_state: session.to_state,
            start_state: session.start_state,
            fraction: session.progress.current_fraction(),
        }
    }
}
