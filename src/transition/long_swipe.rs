//! Continuing a swipe up from an app past the overview, into the item list.
//!
//! A swipe that starts on the navigation bar over a running app first brings up the overview.
//! If the finger keeps going, the rest of the swipe is handed to a [`LongSwipe`], which scrubs
//! the overview to item list transition and settles in one of the two.

use super::completion::{self, CompletionInputs, CompletionPlan, PlannerConfig};
use super::plan::animator_plan;
use super::progress::AnimationProgressController;
use super::{ControllerConfig, TransitionCx};
use crate::animation::Clock;
use crate::input::FlingBlockCheck;
use crate::logging::{ContainerType, Direction, StateChangeAction, Touch};
use crate::state::UiState;

/// The part of a swipe from an app that runs past the overview.
#[derive(Debug)]
pub struct LongSwipe {
    clock: Clock,
    planner: PlannerConfig,
    progress: AnimationProgressController,
    /// Upward displacement that maps to fraction 1. At least one pixel.
    max_swipe_distance: f64,
    fling_block: FlingBlockCheck,
    plan: Option<CompletionPlan>,
}

impl LongSwipe {
    /// Starts the overview to item list transition from the current overview position.
    ///
    /// Flings are blocked from here on for the configured window.
    pub fn start(clock: &Clock, config: &ControllerConfig, cx: &mut TransitionCx) -> Self {
        let _span = tracy_client::span!("LongSwipe::start");

        let geometry = cx.host.geometry();
        let max_swipe_distance = (UiState::Overview.vertical_progress(&geometry)
            * geometry.vertical_shift_range)
            .max(1.);

        let mut fling_block = FlingBlockCheck::new(config.fling_block);
        fling_block.block_fling(clock.now_unadjusted());

        let plan = animator_plan(UiState::Overview, UiState::AllItems);
        let progress = AnimationProgressController::new(plan, clock.clone(), 0.)
            .with_overscroll(config.allow_overscroll);

        debug!("long swipe started, max distance {max_swipe_distance}");
        cx.states.dispatch_transition_start(UiState::AllItems);

        Self {
            clock: clock.clone(),
            planner: config.planner,
            progress,
            max_swipe_distance,
            fling_block,
            plan: None,
        }
    }

    pub fn max_swipe_distance(&self) -> f64 {
        self.max_swipe_distance
    }

    pub fn current_fraction(&self) -> f64 {
        self.progress.current_fraction()
    }

    /// How the swipe settles, once ended.
    pub fn plan(&self) -> Option<&CompletionPlan> {
        self.plan.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.progress.is_running()
    }

    /// Scrubs to `displacement`, measured from where the long swipe started. Up is negative.
    pub fn on_move(&mut self, displacement: f64, cx: &mut TransitionCx) {
        if !self.progress.is_scrubbing() {
            return;
        }

        self.progress
            .set_progress(-displacement / self.max_swipe_distance);
        cx.host
            .apply_fraction(self.progress.plan(), self.progress.current_fraction());
    }

    /// Releases the swipe. `velocity` is in logical pixels per second, up is negative.
    ///
    /// Returns `true` if the swipe settled and committed right away.
    pub fn end(&mut self, velocity: f64, is_fling: bool, cx: &mut TransitionCx) -> bool {
        let _span = tracy_client::span!("LongSwipe::end");

        if !self.progress.is_scrubbing() {
            warn!("long swipe ended twice");
            return false;
        }

        let inputs = CompletionInputs {
            current_fraction: self.progress.current_fraction(),
            velocity,
            is_fling,
            fling_blocked: self.fling_block.is_blocked(self.clock.now_unadjusted()),
            from_state: UiState::Overview,
            to_state: UiState::AllItems,
            travel_distance: -self.max_swipe_distance,
            fallback_distance: -self.max_swipe_distance,
            away_state: UiState::AllItems,
            overshoot_on_fling: false,
        };
        let plan = completion::plan(&inputs, &self.planner);

        debug!(
            "long swipe released at {:.3}, settling to {} over {:?}",
            inputs.current_fraction, plan.target_state, plan.duration
        );

        self.plan = Some(plan);
        let finished =
            self.progress
                .run_to_completion(plan.end_progress, plan.duration, plan.curve, None);

        if finished {
            self.commit(plan, cx);
        } else {
            cx.host
                .apply_fraction(self.progress.plan(), self.progress.current_fraction());
        }
        finished
    }

    /// Advances the settle to the current clock time.
    ///
    /// Returns `true` on the call where the swipe commits.
    pub fn advance_animations(&mut self, cx: &mut TransitionCx) -> bool {
        let Some(plan) = self.plan else {
            return false;
        };

        if self.progress.advance_animations() {
            self.commit(plan, cx);
            return true;
        }

        if self.progress.is_running() {
            cx.host
                .apply_fraction(self.progress.plan(), self.progress.current_fraction());
        }
        false
    }

    /// Abandons the swipe and puts the UI back in the overview without logging anything.
    pub fn destroy(mut self, cx: &mut TransitionCx) {
        debug!("long swipe abandoned");
        self.progress.cancel();
        cx.states.go_to_state(UiState::Overview);
    }

    fn commit(&self, plan: CompletionPlan, cx: &mut TransitionCx) {
        let target = plan.target_state;
        let to_all_items = target == UiState::AllItems;

        cx.host
            .apply_fraction(self.progress.plan(), self.progress.current_fraction());
        cx.states.go_to_state(target);

        if !to_all_items {
            cx.host.show_overview_hint();
            cx.host.enable_swipe_down_launch();
        }

        cx.events.log_state_change_action(StateChangeAction {
            touch: if plan.is_fling {
                Touch::Fling
            } else {
                Touch::Swipe
            },
            direction: Direction::Up,
            touch_target: Some(ContainerType::Navbar),
            src: ContainerType::App,
            dst: if to_all_items {
                ContainerType::AllApps
            } else {
                ContainerType::TaskSwitcher
            },
            from_state: UiState::Overview,
            to_state: target,
        });
    }
}
