//! The gesture state machine.
//!
//! A [`StateTransitionController`] turns one touch sequence at a time into a transition between
//! two [`UiState`]s. The lifecycle is
//!
//! ```text
//! Idle -> Intercepted -> Dragging -> Settling -> Committed
//!                                        |
//!                                        +-> Intercepted (new touch, settle still running)
//!                                               |
//!                                               +-> Cancelled -> Dragging (first movement)
//!                                               +-> Settling (released without moving)
//! ```
//!
//! * A touch that the policy accepts moves the controller to *Intercepted*. Nothing is animated
//!   yet.
//! * The first movement locks in the state pair and builds the progress controller. From then on
//!   every movement scrubs it.
//! * Release asks the completion planner how to finish, and hands the progress controller off to
//!   a timed run.
//! * The frame clock drives the run. When it finishes, the resolved state is committed, listeners
//!   are told, and the interaction is logged.
//!
//! A touch arriving while a session settles may catch it. The settle keeps running until the
//! touch first moves; then the run is cancelled and the next session starts from the frozen
//! position with the same state pair. A touch that lifts without moving leaves the settle alone.
//! At no point does the controller hold more than one session.

use std::time::Duration;

use swipestate_config::Gestures;

use crate::animation::Clock;
use crate::input::{FlingBlockCheck, GestureSignal};
use crate::logging::{ContainerType, Direction, StateChangeAction, Touch, UserEventDispatcher};
use crate::policy::{CatchRule, OrientationPolicy, TouchEnvironment};
use crate::state::{StateManager, TransitionGeometry, UiState};

pub mod completion;
pub mod long_swipe;
pub mod plan;
pub mod progress;
pub mod session;

#[cfg(test)]
mod tests;

pub use self::completion::{CompletionInputs, CompletionPlan, PlannerConfig};
pub use self::long_swipe::LongSwipe;
pub use self::plan::{animator_plan, AnimatedProperty, AnimatorPlan, ItemId};
pub use self::progress::AnimationProgressController;
use self::session::{CaughtTransition, Phase, TransitionSession};

/// The rendering side of a transition.
pub trait TransitionHost {
    /// Current layout geometry.
    fn geometry(&self) -> TransitionGeometry;

    /// Shows the transition described by `plan` at progress `fraction`.
    fn apply_fraction(&mut self, plan: &AnimatorPlan, fraction: f64);

    /// The item that swiping down from the overview would launch.
    fn focused_item(&self) -> Option<ItemId> {
        None
    }

    /// Whether swiping down from the overview launches the focused item rather than going home.
    fn swipe_down_launches_item(&self) -> bool {
        false
    }

    /// Completes an item launch animation. `success` is false when the launch was abandoned.
    fn finish_item_launch(&mut self, item: ItemId, success: bool) {
        let _ = (item, success);
    }

    /// Bounces the overview once to hint that it can be swiped, unless the user already knows.
    fn show_overview_hint(&mut self) {}

    /// Makes the next swipe down from the overview launch the focused item.
    fn enable_swipe_down_launch(&mut self) {}
}

/// Collaborators a controller talks to while handling a call.
pub struct TransitionCx<'a> {
    pub states: &'a mut StateManager,
    pub host: &'a mut dyn TransitionHost,
    pub env: &'a dyn TouchEnvironment,
    pub events: &'a mut dyn UserEventDispatcher,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub planner: PlannerConfig,
    /// Flings released this soon after a session started are judged by position.
    pub fling_block: Duration,
    /// Slack in logical pixels when deciding whether a touch is below the animated position.
    pub catch_tolerance: f64,
    pub allow_overscroll: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from(&Gestures::default())
    }
}

impl From<&Gestures> for ControllerConfig {
    fn from(config: &Gestures) -> Self {
        Self {
            planner: PlannerConfig::from(config),
            fling_block: Duration::from_millis(u64::from(config.fling_block_ms)),
            catch_tolerance: config.catch_tolerance.0,
            allow_overscroll: config.allow_overscroll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Intercepted,
    Dragging,
    Settling,
}

#[derive(Debug)]
enum Gesture {
    Idle,
    /// Touch taken, waiting for the first movement. A transition that was settling when the
    /// touch went down keeps running until then.
    Intercepted {
        settling: Option<TransitionSession>,
    },
    Active(TransitionSession),
}

/// Drives transitions between UI states from touch gestures.
#[derive(Debug)]
pub struct StateTransitionController {
    policy: Box<dyn OrientationPolicy>,
    clock: Clock,
    config: ControllerConfig,
    gesture: Gesture,
}

impl StateTransitionController {
    pub fn new(policy: Box<dyn OrientationPolicy>, clock: Clock, config: ControllerConfig) -> Self {
        Self {
            policy,
            clock,
            config,
            gesture: Gesture::Idle,
        }
    }

    pub fn policy(&self) -> &dyn OrientationPolicy {
        &*self.policy
    }

    pub fn phase(&self) -> ControllerPhase {
        match &self.gesture {
            Gesture::Idle => ControllerPhase::Idle,
            Gesture::Intercepted { .. } => ControllerPhase::Intercepted,
            Gesture::Active(session) => match session.phase {
                Phase::Dragging => ControllerPhase::Dragging,
                Phase::Settling => ControllerPhase::Settling,
            },
        }
    }

    pub fn session(&self) -> Option<&TransitionSession> {
        match &self.gesture {
            Gesture::Active(session)
            | Gesture::Intercepted {
                settling: Some(session),
            } => Some(session),
            _ => None,
        }
    }

    /// Whether a touch sequence or a settle is in progress.
    pub fn is_busy(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.session()
            .is_some_and(|session| session.progress.is_running())
    }

    /// Returns whether a touch going down now would be taken by this controller.
    ///
    /// A settling session flagged to finish fast is committed right here, and the touch is then
    /// judged as if the controller were idle.
    pub fn can_intercept(&mut self, signal: &GestureSignal, cx: &mut TransitionCx) -> bool {
        if cx.env.has_blocking_overlay() {
            debug!("{}: not intercepting, overlay open", self.policy.name());
            return false;
        }

        let finish_fast = match &self.gesture {
            Gesture::Idle => false,
            Gesture::Intercepted { .. } => {
                debug!("{}: not intercepting, touch already taken", self.policy.name());
                return false;
            }
            Gesture::Active(session) => match session.phase {
                Phase::Dragging => {
                    debug!("{}: not intercepting, already dragging", self.policy.name());
                    return false;
                }
                Phase::Settling if session.finish_fast_on_next_touch => true,
                Phase::Settling => return self.can_catch(session, signal, cx),
            },
        };

        if finish_fast {
            self.finish_settling_now(cx);
        }

        self.policy
            .can_intercept_touch(signal, cx.states.state(), cx.env)
    }

    /// Handles a touch going down. Returns whether the controller took it.
    pub fn on_gesture_start(&mut self, signal: &GestureSignal, cx: &mut TransitionCx) -> bool {
        let _span = tracy_client::span!("StateTransitionController::on_gesture_start");

        if !self.can_intercept(signal, cx) {
            return false;
        }

        let settling = match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Active(session) => {
                trace!(
                    "{}: touch down during {} -> {} settle",
                    self.policy.name(),
                    session.from_state,
                    session.to_state
                );
                Some(session)
            }
            _ => None,
        };

        self.gesture = Gesture::Intercepted { settling };
        true
    }

    /// Handles a touch movement. Returns whether the controller consumed it.
    pub fn on_gesture_move(&mut self, signal: &GestureSignal, cx: &mut TransitionCx) -> bool {
        let _span = tracy_client::span!("StateTransitionController::on_gesture_move");

        let starting = match &self.gesture {
            Gesture::Idle => return false,
            Gesture::Intercepted { .. } => true,
            Gesture::Active(session) if session.phase == Phase::Dragging => false,
            Gesture::Active(_) => return false,
        };

        if starting {
            if signal.displacement == 0. {
                return true;
            }

            let caught = match std::mem::replace(&mut self.gesture, Gesture::Idle) {
                Gesture::Intercepted {
                    settling: Some(session),
                } => Some(self.catch(session, cx)),
                _ => None,
            };

            let session = self.start_session(signal, caught, cx);
            self.gesture = Gesture::Active(session);
        }

        let Gesture::Active(session) = &mut self.gesture else {
            return true;
        };

        let fraction = session.fraction_for(signal.displacement);
        session.progress.set_progress(fraction);
        cx.host.apply_fraction(
            session.progress.plan(),
            session.progress.current_fraction(),
        );
        true
    }

    /// Handles the touch lifting. Returns whether the controller consumed it.
    pub fn on_gesture_end(&mut self, signal: &GestureSignal, cx: &mut TransitionCx) -> bool {
        let _span = tracy_client::span!("StateTransitionController::on_gesture_end");

        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => false,
            Gesture::Intercepted { settling } => {
                trace!("{}: released without moving", self.policy.name());
                if let Some(session) = settling {
                    self.gesture = Gesture::Active(session);
                }
                true
            }
            Gesture::Active(session) if session.phase == Phase::Dragging => {
                self.gesture = Gesture::Active(session);
                self.release(signal, cx);
                true
            }
            gesture @ Gesture::Active(_) => {
                self.gesture = gesture;
                false
            }
        }
    }

    /// Advances a settling transition to the current clock time.
    ///
    /// Returns `true` if the transition committed.
    pub fn advance_animations(&mut self, cx: &mut TransitionCx) -> bool {
        let _span = tracy_client::span!("StateTransitionController::advance_animations");

        let session = match &mut self.gesture {
            Gesture::Active(session) if session.phase == Phase::Settling => session,
            Gesture::Intercepted {
                settling: Some(session),
            } => session,
            _ => return false,
        };

        if session.progress.advance_animations() {
            self.commit_active(cx);
            return true;
        }

        cx.host.apply_fraction(
            session.progress.plan(),
            session.progress.current_fraction(),
        );
        false
    }

    /// Abandons the current touch sequence, e.g. when the touch is cancelled.
    ///
    /// The transition freezes where it is and no state is committed.
    pub fn cancel(&mut self, cx: &mut TransitionCx) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Active(mut session) => {
                debug!(
                    "{}: cancelled {} -> {}",
                    self.policy.name(),
                    session.from_state,
                    session.to_state
                );
                session.progress.cancel();
                if let Some(item) = session.pending_launch.take() {
                    cx.host.finish_item_launch(item, false);
                }
            }
            // Only the touch goes away; the settle it was holding carries on.
            Gesture::Intercepted {
                settling: Some(session),
            } => self.gesture = Gesture::Active(session),
            Gesture::Intercepted { settling: None } | Gesture::Idle => (),
        }
    }

    /// Stops a settle that a moving touch took over, returning where it froze.
    fn catch(&self, mut session: TransitionSession, cx: &mut TransitionCx) -> CaughtTransition {
        session.progress.cancel();
        if let Some(item) = session.pending_launch.take() {
            cx.host.finish_item_launch(item, false);
        }

        let caught = CaughtTransition::from_session(&session);
        debug!(
            "{}: caught {} -> {} at {:.3}",
            self.policy.name(),
            caught.from_state,
            caught.to_state,
            caught.fraction
        );
        caught
    }

    fn can_catch(
        &self,
        session: &TransitionSession,
        signal: &GestureSignal,
        cx: &TransitionCx,
    ) -> bool {
        match self.policy.catch_rule() {
            CatchRule::Always => true,
            CatchRule::BelowAnimatedPosition => {
                let geometry = cx.host.geometry();
                let animated = self.policy.state_position(session.from_state, &geometry)
                    + session.progress.current_fraction() * session.scrub_distance;

                let catches = signal.position >= animated - self.config.catch_tolerance;
                if !catches {
                    debug!(
                        "{}: touch at {} above animated position {animated:.1}, not catching",
                        self.policy.name(),
                        signal.position
                    );
                }
                catches
            }
        }
    }

    fn start_session(
        &self,
        signal: &GestureSignal,
        caught: Option<CaughtTransition>,
        cx: &mut TransitionCx,
    ) -> TransitionSession {
        let toward_positive = self.policy.is_drag_toward_positive(signal.displacement);

        let (from_state, to_state, start_state, start_fraction) = match caught {
            Some(caught) => (
                caught.from_state,
                caught.to_state,
                caught.start_state,
                caught.fraction,
            ),
            None => {
                let from = cx.states.state();
                let mut to = self
                    .policy
                    .target_state(from, toward_positive, cx.states.last_state());
                if to != from && !from.can_transition_to(to) {
                    warn!(
                        "{}: {from} -> {to} is not a valid transition, staying in {from}",
                        self.policy.name()
                    );
                    to = from;
                }
                (from, to, from, 0.)
            }
        };

        let geometry = cx.host.geometry();
        let mut travel_distance = self.policy.travel_distance(from_state, to_state, &geometry);
        if !travel_distance.is_finite() {
            travel_distance = 0.;
        }

        let scrub_distance = if travel_distance == 0. {
            let fallback = self
                .policy
                .fallback_distance(from_state, to_state, &geometry);
            debug!("{from_state} -> {to_state} has no travel, using {fallback}");
            fallback
        } else {
            travel_distance
        };

        let pending_launch = self.pending_launch(from_state, to_state, cx);
        let plan = match pending_launch {
            Some(item) => AnimatorPlan::LaunchItem(item),
            None if travel_distance == 0. => AnimatorPlan::Empty,
            None => animator_plan(from_state, to_state),
        };

        debug!(
            "{}: {from_state} -> {to_state}, travel {travel_distance}, from {start_fraction:.3}",
            self.policy.name()
        );

        let progress = AnimationProgressController::new(plan, self.clock.clone(), start_fraction)
            .with_overscroll(self.config.allow_overscroll);

        cx.states.dispatch_transition_start(to_state);

        let mut fling_block = FlingBlockCheck::new(self.config.fling_block);
        fling_block.block_fling(self.clock.now_unadjusted());

        TransitionSession {
            from_state,
            to_state,
            start_state,
            start_fraction: progress.current_fraction(),
            progress,
            pending_launch,
            finish_fast_on_next_touch: false,
            travel_distance,
            scrub_distance,
            fling_block,
            phase: Phase::Dragging,
            plan: None,
        }
    }

    fn pending_launch(&self, from: UiState, to: UiState, cx: &TransitionCx) -> Option<ItemId> {
        if from == UiState::Overview
            && to == UiState::Normal
            && self.policy.supports_item_launch()
            && cx.host.swipe_down_launches_item()
        {
            cx.host.focused_item()
        } else {
            None
        }
    }

    fn release(&mut self, signal: &GestureSignal, cx: &mut TransitionCx) {
        let Gesture::Active(session) = &mut self.gesture else {
            return;
        };

        let first_swipe = session.from_state == UiState::Normal
            && session.to_state == UiState::Overview
            && self.policy.overshoots_first_swipe();

        let inputs = CompletionInputs {
            current_fraction: session.progress.current_fraction(),
            velocity: signal.velocity,
            is_fling: signal.is_fling,
            fling_blocked: session.fling_block.is_blocked(self.clock.now_unadjusted()),
            from_state: session.from_state,
            to_state: session.to_state,
            travel_distance: session.travel_distance,
            fallback_distance: session.scrub_distance,
            away_state: self.policy.away_state(),
            overshoot_on_fling: first_swipe,
        };
        let plan = completion::plan(&inputs, &self.config.planner);

        debug!(
            "{}: released at {:.3}, settling to {} over {:?} ({}{})",
            self.policy.name(),
            inputs.current_fraction,
            plan.target_state,
            plan.duration,
            plan.curve.name(),
            if plan.is_fling { ", fling" } else { "" },
        );

        session.finish_fast_on_next_touch = first_swipe && plan.target_state == UiState::Overview;
        session.phase = Phase::Settling;
        session.plan = Some(plan);

        let finished =
            session
                .progress
                .run_to_completion(plan.end_progress, plan.duration, plan.curve, None);

        if finished {
            self.commit_active(cx);
        } else {
            cx.host.apply_fraction(
                session.progress.plan(),
                session.progress.current_fraction(),
            );
        }
    }

    fn finish_settling_now(&mut self, cx: &mut TransitionCx) {
        if let Gesture::Active(session) = &mut self.gesture {
            debug!("{}: finishing settle on second touch", self.policy.name());
            session.progress.end_now();
        }

        self.commit_active(cx);
    }

    fn commit_active(&mut self, cx: &mut TransitionCx) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Active(session) => self.commit(session, cx),
            Gesture::Intercepted {
                settling: Some(session),
            } => {
                // The touch stays down, and its first movement starts from the committed state.
                self.gesture = Gesture::Intercepted { settling: None };
                self.commit(session, cx);
            }
            gesture => self.gesture = gesture,
        }
    }

    fn commit(&self, session: TransitionSession, cx: &mut TransitionCx) {
        let Some(plan) = session.plan else {
            warn!("{}: committing a session that never settled", self.policy.name());
            return;
        };
        let target = plan.target_state;

        cx.host.apply_fraction(
            session.progress.plan(),
            session.progress.current_fraction(),
        );

        if let Some(item) = session.pending_launch {
            cx.host
                .finish_item_launch(item, target != session.from_state);
        }

        cx.states.go_to_state(target);

        if target != session.start_state {
            let direction = self.policy.log_direction().unwrap_or(
                if target.ordinal() > session.start_state.ordinal() {
                    Direction::Up
                } else {
                    Direction::Down
                },
            );

            cx.events.log_state_change_action(StateChangeAction {
                touch: if plan.is_fling {
                    Touch::Fling
                } else {
                    Touch::Swipe
                },
                direction,
                touch_target: None,
                src: self.container_for(session.start_state),
                dst: self.container_for(target),
                from_state: session.start_state,
                to_state: target,
            });
        }
    }

    fn container_for(&self, state: UiState) -> ContainerType {
        match state {
            UiState::Normal => self.policy.normal_container(),
            UiState::Overview | UiState::QuickScrub => ContainerType::TaskSwitcher,
            UiState::AllItems => ContainerType::AllApps,
        }
    }
}
