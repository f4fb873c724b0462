use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use super::*;
use crate::animation::Curve;
use crate::logging::RecordingDispatcher;
use crate::policy::tests::{geometry, FixedEnvironment};
use crate::policy::{Axis, OverviewToAllItems, Portrait};
use crate::state::StateChangeListener;

type Timeline = Rc<RefCell<Vec<String>>>;

struct TestHost {
    geometry: TransitionGeometry,
    timeline: Timeline,
    fractions: Vec<f64>,
    focused_item: Option<ItemId>,
    swipe_down_launches_item: bool,
    launches: Vec<(ItemId, bool)>,
    overview_hints: usize,
    swipe_down_launch_enabled: bool,
}

impl TransitionHost for TestHost {
    fn geometry(&self) -> TransitionGeometry {
        self.geometry
    }

    fn apply_fraction(&mut self, _plan: &AnimatorPlan, fraction: f64) {
        self.fractions.push(fraction);
        self.timeline
            .borrow_mut()
            .push(format!("fraction {fraction:.5}"));
    }

    fn focused_item(&self) -> Option<ItemId> {
        self.focused_item
    }

    fn swipe_down_launches_item(&self) -> bool {
        self.swipe_down_launches_item
    }

    fn finish_item_launch(&mut self, item: ItemId, success: bool) {
        self.launches.push((item, success));
    }

    fn show_overview_hint(&mut self) {
        self.overview_hints += 1;
    }

    fn enable_swipe_down_launch(&mut self) {
        self.swipe_down_launch_enabled = true;
    }
}

struct TimelineListener(Timeline);

impl StateChangeListener for TimelineListener {
    fn on_state_transition_start(&mut self, target: UiState) {
        self.0.borrow_mut().push(format!("transition start {target}"));
    }

    fn on_state_committed(&mut self, state: UiState, previous: UiState) {
        self.0
            .borrow_mut()
            .push(format!("committed {state} from {previous}"));
    }
}

struct Fixture {
    clock: Clock,
    states: StateManager,
    host: TestHost,
    env: FixedEnvironment,
    events: RecordingDispatcher,
    controller: StateTransitionController,
    timeline: Timeline,
}

impl Fixture {
    fn new(policy: Box<dyn OrientationPolicy>, state: UiState) -> Self {
        let clock = Clock::with_time(Duration::ZERO);
        let timeline = Timeline::default();

        let mut states = StateManager::new(state);
        states.add_listener(Box::new(TimelineListener(timeline.clone())));

        let host = TestHost {
            geometry: geometry(),
            timeline: timeline.clone(),
            fractions: Vec::new(),
            focused_item: None,
            swipe_down_launches_item: false,
            launches: Vec::new(),
            overview_hints: 0,
            swipe_down_launch_enabled: false,
        };

        let controller =
            StateTransitionController::new(policy, clock.clone(), ControllerConfig::default());

        Self {
            clock,
            states,
            host,
            env: FixedEnvironment::default(),
            events: RecordingDispatcher::default(),
            controller,
            timeline,
        }
    }

    fn portrait(state: UiState) -> Self {
        Self::new(Box::new(Portrait::new(true)), state)
    }

    fn with_cx<R>(
        &mut self,
        f: impl FnOnce(&mut StateTransitionController, &mut TransitionCx<'_>) -> R,
    ) -> R {
        let mut cx = TransitionCx {
            states: &mut self.states,
            host: &mut self.host,
            env: &self.env,
            events: &mut self.events,
        };
        f(&mut self.controller, &mut cx)
    }

    fn cx(&mut self) -> TransitionCx<'_> {
        TransitionCx {
            states: &mut self.states,
            host: &mut self.host,
            env: &self.env,
            events: &mut self.events,
        }
    }

    fn down(&mut self, signal: GestureSignal) -> bool {
        self.with_cx(|c, cx| c.on_gesture_start(&signal, cx))
    }

    fn move_to(&mut self, displacement: f64) -> bool {
        self.with_cx(|c, cx| c.on_gesture_move(&GestureSignal::moved(displacement, 0.), cx))
    }

    fn up(&mut self, displacement: f64, velocity: f64, is_fling: bool) -> bool {
        let signal = GestureSignal::released(displacement, velocity, is_fling);
        self.with_cx(|c, cx| c.on_gesture_end(&signal, cx))
    }

    fn advance_to(&mut self, ms: u64) -> bool {
        self.clock.set_unadjusted(Duration::from_millis(ms));
        self.with_cx(|c, cx| c.advance_animations(cx))
    }

    fn cancel(&mut self) {
        self.with_cx(|c, cx| c.cancel(cx))
    }

    fn plan(&self) -> CompletionPlan {
        self.controller.session().unwrap().plan.unwrap()
    }

    fn fraction(&self) -> f64 {
        self.controller
            .session()
            .unwrap()
            .progress
            .current_fraction()
    }

    fn start_long_swipe(&mut self) -> LongSwipe {
        let clock = self.clock.clone();
        LongSwipe::start(&clock, &ControllerConfig::default(), &mut self.cx())
    }

    /// Runs the long swipe settle until it commits.
    fn settle_long_swipe(&mut self, swipe: &mut LongSwipe) {
        let mut ms = self.clock.now_unadjusted().as_millis() as u64;
        for _ in 0..100 {
            ms += 16;
            self.clock.set_unadjusted(Duration::from_millis(ms));
            if swipe.advance_animations(&mut self.cx()) {
                return;
            }
        }
        panic!("long swipe never committed");
    }

    /// Runs the settle until it commits.
    fn settle(&mut self) {
        let mut ms = self.clock.now_unadjusted().as_millis() as u64;
        for _ in 0..100 {
            ms += 16;
            if self.advance_to(ms) {
                return;
            }
        }
        panic!("transition never committed");
    }
}

fn edge_touch() -> GestureSignal {
    GestureSignal::down(990.).with_edge_origin()
}

#[test]
fn swipe_up_to_overview() {
    let mut f = Fixture::portrait(UiState::Normal);

    assert!(f.down(edge_touch()));
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);

    assert!(f.move_to(-100.));
    assert_eq!(f.controller.phase(), ControllerPhase::Dragging);
    assert_abs_diff_eq!(f.fraction(), 0.4);

    f.advance_to(300);
    assert!(f.move_to(-150.));
    assert!(f.up(-150., 0., false));
    assert_eq!(f.controller.phase(), ControllerPhase::Settling);
    assert_eq!(f.plan().target_state, UiState::Overview);

    f.settle();
    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.host.fractions.last(), Some(&1.));

    let [action] = f.events.actions[..] else {
        panic!("expected one action: {:?}", f.events.actions);
    };
    assert_eq!(
        action,
        StateChangeAction {
            touch: Touch::Swipe,
            direction: Direction::Up,
            touch_target: None,
            src: ContainerType::Hotseat,
            dst: ContainerType::TaskSwitcher,
            from_state: UiState::Normal,
            to_state: UiState::Overview,
        }
    );
}

#[test]
fn settle_timeline() {
    let mut f = Fixture::portrait(UiState::Normal);

    f.down(edge_touch());
    f.move_to(-50.);
    f.move_to(-100.);
    f.move_to(-150.);
    f.up(-150., 0., false);

    let plan = f.plan();
    assert_eq!(plan.duration, Duration::from_millis(280));
    assert_eq!(plan.curve, Curve::EaseOutCubic);

    for ms in [70, 140, 210, 280] {
        f.advance_to(ms);
    }

    insta::assert_snapshot!(f.timeline.borrow().join("\n"), @r"
    transition start overview
    fraction 0.20000
    fraction 0.40000
    fraction 0.60000
    fraction 0.60000
    fraction 0.83125
    fraction 0.95000
    fraction 0.99375
    fraction 1.00000
    committed overview from normal
    ");
}

#[test]
fn release_without_moving_does_nothing() {
    let mut f = Fixture::portrait(UiState::Normal);

    assert!(f.down(edge_touch()));
    assert!(f.move_to(0.));
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);
    assert!(f.up(0., 0., false));

    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
    assert_eq!(f.states.state(), UiState::Normal);
    assert!(f.events.actions.is_empty());
    assert!(f.timeline.borrow().is_empty());
}

#[test]
fn touches_outside_the_edge_are_ignored() {
    let mut f = Fixture::portrait(UiState::Normal);
    assert!(!f.down(GestureSignal::down(300.)));
    assert!(!f.move_to(-100.));
    assert!(!f.up(-100., 0., false));
    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
}

#[test]
fn blocking_overlay_prevents_interception() {
    let mut f = Fixture::portrait(UiState::Normal);
    f.env.blocking_overlay = true;
    assert!(!f.down(edge_touch()));
    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
}

#[test]
fn one_session_at_a_time() {
    let mut f = Fixture::portrait(UiState::Normal);

    f.down(edge_touch());
    f.move_to(-100.);
    assert!(!f.down(edge_touch()));
    assert_eq!(f.controller.phase(), ControllerPhase::Dragging);

    // The first session keeps scrubbing.
    f.move_to(-125.);
    assert_abs_diff_eq!(f.fraction(), 0.5);
}

#[test]
fn blocked_fling_overshoots_into_overview() {
    let mut f = Fixture::portrait(UiState::Normal);

    f.down(edge_touch());
    f.move_to(-100.);
    f.advance_to(50);
    f.move_to(-400.);
    assert_eq!(f.fraction(), 1.);

    // Released well within the fling block window.
    f.advance_to(100);
    f.up(-400., -3000., true);

    let plan = f.plan();
    let config = PlannerConfig::default();
    assert_eq!(plan.target_state, UiState::Overview);
    assert!(!plan.is_fling);
    assert!(plan.overshoot.is_some());
    assert_eq!(plan.curve, Curve::Overshoot { tension: 3. });
    assert!(plan.duration >= config.min_overshoot_duration);
    assert!(plan.duration <= config.max_swipe_duration);

    f.settle();
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.events.actions[0].touch, Touch::Swipe);
}

#[test]
fn fling_is_trusted_after_the_block_window() {
    let mut blocked = Fixture::portrait(UiState::Normal);
    blocked.down(edge_touch());
    blocked.move_to(-50.);
    blocked.advance_to(150);
    blocked.up(-50., -2000., true);
    assert_eq!(blocked.plan().target_state, UiState::Normal);
    assert!(!blocked.plan().is_fling);

    let mut trusted = Fixture::portrait(UiState::Normal);
    trusted.down(edge_touch());
    trusted.move_to(-50.);
    trusted.advance_to(300);
    trusted.up(-50., -2000., true);

    let plan = trusted.plan();
    assert_eq!(plan.target_state, UiState::Overview);
    assert!(plan.is_fling);
    // First swipe into the overview overshoots, capped at the atomic duration.
    assert_eq!(plan.curve, Curve::Overshoot { tension: 2. });
    assert_eq!(plan.duration, Duration::from_millis(200));

    trusted.settle();
    assert_eq!(trusted.events.actions[0].touch, Touch::Fling);
}

#[test]
fn second_touch_finishes_first_swipe() {
    let mut f = Fixture::portrait(UiState::Normal);

    f.down(edge_touch());
    f.move_to(-200.);
    f.up(-200., 0., false);
    assert!(f.controller.session().unwrap().finish_fast_on_next_touch);
    assert_eq!(f.states.state(), UiState::Normal);

    // The settle is committed on the spot, then the touch is judged in the overview.
    assert!(f.down(edge_touch()));
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);
    assert_eq!(f.events.actions.len(), 1);

    // Swiping down goes back home.
    f.move_to(100.);
    let session = f.controller.session().unwrap();
    assert_eq!(session.from_state, UiState::Overview);
    assert_eq!(session.to_state, UiState::Normal);
    assert_eq!(session.start_fraction, 0.);
}

/// Settles from the overview towards the item list, 100 ms into a 280 ms run.
fn settling_into_all_items(f: &mut Fixture) {
    f.down(edge_touch());
    f.move_to(-450.);
    assert_abs_diff_eq!(f.fraction(), 0.6);
    f.up(-450., 0., false);
    assert_eq!(f.plan().target_state, UiState::AllItems);
    assert_eq!(f.plan().duration, Duration::from_millis(280));
    assert!(!f.advance_to(100));
}

#[test]
fn touch_below_animated_position_catches_settle() {
    let mut f = Fixture::portrait(UiState::Overview);
    settling_into_all_items(&mut f);

    let frozen = f.fraction();
    assert!(frozen > 0.6 && frozen < 1.);

    // The list panel is at 750 - 750 * frozen, roughly 80 px from the top.
    assert!(f.down(GestureSignal::down(500.)));
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);
    assert!(f.controller.are_animations_ongoing());
    assert!(f.events.actions.is_empty());
    assert_eq!(f.states.state(), UiState::Overview);

    // Dragging down resumes from where the settle froze, with the same pair.
    f.move_to(75.);
    assert!(!f.controller.are_animations_ongoing());
    let session = f.controller.session().unwrap();
    assert_eq!(session.from_state, UiState::Overview);
    assert_eq!(session.to_state, UiState::AllItems);
    assert_abs_diff_eq!(session.start_fraction, frozen);
    assert_abs_diff_eq!(f.fraction(), frozen - 0.1, epsilon = 1e-9);

    f.up(75., 0., false);
    f.settle();
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.events.actions.len(), 1);
    assert_eq!(f.events.actions[0].direction, Direction::Up);
    assert_eq!(f.events.actions[0].dst, ContainerType::AllApps);
}

#[test]
fn tap_during_settle_lets_it_finish() {
    let mut f = Fixture::portrait(UiState::Overview);
    settling_into_all_items(&mut f);

    assert!(f.down(GestureSignal::down(500.)));
    assert!(f.up(0., 0., false));
    assert_eq!(f.controller.phase(), ControllerPhase::Settling);

    f.settle();
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.host.fractions.last(), Some(&1.));
    assert_eq!(f.events.actions.len(), 1);
}

#[test]
fn settle_finishing_under_a_held_touch_commits() {
    let mut f = Fixture::portrait(UiState::Overview);
    settling_into_all_items(&mut f);

    assert!(f.down(GestureSignal::down(500.)));
    assert!(f.advance_to(1000));
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);

    // The held touch now drags out of the item list.
    f.move_to(75.);
    let session = f.controller.session().unwrap();
    assert_eq!(session.from_state, UiState::AllItems);
    assert_eq!(session.to_state, UiState::Overview);
    assert_eq!(session.start_fraction, 0.);
}

#[test]
fn cancelled_tap_leaves_settle_running() {
    let mut f = Fixture::portrait(UiState::Overview);
    settling_into_all_items(&mut f);

    assert!(f.down(GestureSignal::down(500.)));
    f.cancel();
    assert_eq!(f.controller.phase(), ControllerPhase::Settling);

    f.settle();
    assert_eq!(f.states.state(), UiState::AllItems);
}

#[test]
fn touch_above_animated_position_is_vetoed() {
    let mut f = Fixture::portrait(UiState::Overview);
    settling_into_all_items(&mut f);

    assert!(!f.down(GestureSignal::down(50.)));
    assert_eq!(f.controller.phase(), ControllerPhase::Settling);

    f.settle();
    assert_eq!(f.states.state(), UiState::AllItems);
}

#[test]
fn catch_tolerance_widens_the_catch_area() {
    let mut f = Fixture::portrait(UiState::Overview);
    f.controller.config.catch_tolerance = 100.;
    settling_into_all_items(&mut f);

    assert!(f.down(GestureSignal::down(50.)));
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);
}

#[test]
fn always_catching_policy() {
    let mut f = Fixture::new(Box::new(OverviewToAllItems::new(true)), UiState::Normal);

    assert!(f.down(GestureSignal::down(500.)));
    f.move_to(-600.);
    f.up(-600., 0., false);
    assert_eq!(f.plan().target_state, UiState::AllItems);
    f.advance_to(50);

    assert!(f.down(GestureSignal::down(0.)));
    assert_eq!(f.controller.phase(), ControllerPhase::Intercepted);
}

#[test]
fn swipe_down_launches_focused_item() {
    let mut f = Fixture::portrait(UiState::Overview);
    f.host.swipe_down_launches_item = true;
    f.host.focused_item = Some(ItemId(7));

    f.down(edge_touch());
    f.move_to(200.);
    assert_eq!(
        f.controller.session().unwrap().progress.plan(),
        &AnimatorPlan::LaunchItem(ItemId(7))
    );

    f.up(200., 0., false);
    f.settle();
    assert_eq!(f.host.launches, [(ItemId(7), true)]);
    assert_eq!(f.states.state(), UiState::Normal);
}

#[test]
fn abandoned_item_launch_fails() {
    let mut f = Fixture::portrait(UiState::Overview);
    f.host.swipe_down_launches_item = true;
    f.host.focused_item = Some(ItemId(7));

    f.down(edge_touch());
    f.move_to(50.);
    f.up(50., 0., false);
    f.settle();
    assert_eq!(f.host.launches, [(ItemId(7), false)]);
    assert_eq!(f.states.state(), UiState::Overview);
    assert!(f.events.actions.is_empty());

    f.down(edge_touch());
    f.move_to(50.);
    f.cancel();
    assert_eq!(f.host.launches, [(ItemId(7), false), (ItemId(7), false)]);
    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
}

#[test]
fn no_item_launch_without_focus() {
    let mut f = Fixture::portrait(UiState::Overview);
    f.host.swipe_down_launches_item = true;

    f.down(edge_touch());
    f.move_to(50.);
    assert!(matches!(
        f.controller.session().unwrap().progress.plan(),
        AnimatorPlan::States { .. }
    ));
}

#[test]
fn cancel_freezes_without_committing() {
    let mut f = Fixture::portrait(UiState::Normal);

    f.down(edge_touch());
    f.move_to(-200.);
    f.up(-200., 0., false);
    f.advance_to(50);
    f.cancel();

    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
    assert!(!f.advance_to(1000));
    assert_eq!(f.states.state(), UiState::Normal);
    assert!(f.events.actions.is_empty());
}

#[test]
fn animations_off_commit_on_release() {
    let mut f = Fixture::portrait(UiState::Normal);
    f.clock.set_complete_instantly(true);

    f.down(edge_touch());
    f.move_to(-150.);
    assert!(f.up(-150., 0., false));

    assert_eq!(f.controller.phase(), ControllerPhase::Idle);
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.host.fractions.last(), Some(&1.));
    assert_eq!(f.events.actions.len(), 1);
}

#[test]
fn slowdown_stretches_the_settle() {
    let mut f = Fixture::portrait(UiState::Normal);
    f.clock.set_rate(0.5);

    f.down(edge_touch());
    f.move_to(-150.);
    f.up(-150., 0., false);
    assert_eq!(f.plan().duration, Duration::from_millis(280));

    assert!(!f.advance_to(300));
    assert_eq!(f.states.state(), UiState::Normal);
    assert!(f.advance_to(560));
    assert_eq!(f.states.state(), UiState::Overview);
}

#[derive(Debug)]
struct TowardsQuickScrub;

impl OrientationPolicy for TowardsQuickScrub {
    fn name(&self) -> &'static str {
        "towards-quick-scrub"
    }

    fn tracked_axis(&self) -> Axis {
        Axis::Vertical
    }

    fn can_intercept_touch(
        &self,
        _signal: &GestureSignal,
        _state: UiState,
        _env: &dyn TouchEnvironment,
    ) -> bool {
        true
    }

    fn target_state(&self, _from: UiState, _toward_positive: bool, _last: UiState) -> UiState {
        UiState::QuickScrub
    }

    fn shift_range(&self, geometry: &TransitionGeometry) -> f64 {
        geometry.vertical_shift_range
    }

    fn catch_rule(&self) -> CatchRule {
        CatchRule::Always
    }

    fn normal_container(&self) -> ContainerType {
        ContainerType::Workspace
    }
}

#[test]
fn unreachable_target_is_a_no_op() {
    let mut f = Fixture::new(Box::new(TowardsQuickScrub), UiState::Normal);

    f.down(GestureSignal::down(500.));
    f.move_to(-100.);
    let session = f.controller.session().unwrap();
    assert_eq!(session.to_state, UiState::Normal);
    assert_eq!(session.travel_distance, 0.);
    assert_eq!(session.scrub_distance, -250.);
    assert!(session.progress.plan().is_empty());

    f.up(-100., 0., false);
    let plan = f.plan();
    assert!(plan.duration > Duration::ZERO);

    f.settle();
    assert_eq!(f.states.state(), UiState::Normal);
    assert!(f.events.actions.is_empty());
}

#[test]
fn long_swipe_spans_rest_of_item_list_travel() {
    let mut f = Fixture::portrait(UiState::Overview);
    let swipe = f.start_long_swipe();
    assert_eq!(swipe.max_swipe_distance(), 750.);
    assert_eq!(swipe.current_fraction(), 0.);
    assert_eq!(
        f.timeline.borrow().last().map(String::as_str),
        Some("transition start all-items")
    );

    // The overview already sits where the item list opens fully.
    f.host.geometry.overview_swipe_height = f.host.geometry.vertical_shift_range;
    let swipe = f.start_long_swipe();
    assert_eq!(swipe.max_swipe_distance(), 1.);
}

#[test]
fn long_swipe_past_half_opens_item_list() {
    let mut f = Fixture::portrait(UiState::Overview);
    let mut swipe = f.start_long_swipe();

    swipe.on_move(-450., &mut f.cx());
    assert_abs_diff_eq!(swipe.current_fraction(), 0.6);
    assert_eq!(f.host.fractions.last(), Some(&0.6));

    f.clock.set_unadjusted(Duration::from_millis(300));
    assert!(!swipe.end(-100., false, &mut f.cx()));
    let plan = *swipe.plan().unwrap();
    assert_eq!(plan.target_state, UiState::AllItems);
    assert!(!plan.is_fling);
    assert!(plan.overshoot.is_none());
    assert!(swipe.is_running());

    f.settle_long_swipe(&mut swipe);
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.host.fractions.last(), Some(&1.));
    assert_eq!(f.host.overview_hints, 0);
    assert!(!f.host.swipe_down_launch_enabled);

    let [action] = f.events.actions[..] else {
        panic!("expected one action: {:?}", f.events.actions);
    };
    assert_eq!(
        action,
        StateChangeAction {
            touch: Touch::Swipe,
            direction: Direction::Up,
            touch_target: Some(ContainerType::Navbar),
            src: ContainerType::App,
            dst: ContainerType::AllApps,
            from_state: UiState::Overview,
            to_state: UiState::AllItems,
        }
    );

    // Nothing more happens once committed.
    assert!(!swipe.advance_animations(&mut f.cx()));
    assert_eq!(f.events.actions.len(), 1);
}

#[test]
fn early_long_swipe_fling_overshoots_back_to_overview() {
    let mut f = Fixture::portrait(UiState::Overview);
    let mut swipe = f.start_long_swipe();

    swipe.on_move(-150., &mut f.cx());
    swipe.end(-3000., true, &mut f.cx());
    let plan = *swipe.plan().unwrap();
    assert_eq!(plan.target_state, UiState::Overview);
    assert!(!plan.is_fling);
    assert!(plan.overshoot.is_some());

    f.settle_long_swipe(&mut swipe);
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.host.overview_hints, 1);
    assert!(f.host.swipe_down_launch_enabled);

    let [action] = f.events.actions[..] else {
        panic!("expected one action: {:?}", f.events.actions);
    };
    assert_eq!(action.touch, Touch::Swipe);
    assert_eq!(action.touch_target, Some(ContainerType::Navbar));
    assert_eq!(action.src, ContainerType::App);
    assert_eq!(action.dst, ContainerType::TaskSwitcher);
    assert_eq!(action.to_state, UiState::Overview);
}

#[test]
fn long_swipe_fling_follows_direction() {
    let mut f = Fixture::portrait(UiState::Overview);
    let mut swipe = f.start_long_swipe();

    swipe.on_move(-150., &mut f.cx());
    f.clock.set_unadjusted(Duration::from_millis(300));
    swipe.end(-3000., true, &mut f.cx());
    let plan = *swipe.plan().unwrap();
    assert_eq!(plan.target_state, UiState::AllItems);
    assert!(plan.is_fling);
    assert!(plan.overshoot.is_none());
    assert_eq!(plan.duration, Duration::from_millis(350));

    f.settle_long_swipe(&mut swipe);
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.events.actions[0].touch, Touch::Fling);
    assert_eq!(f.events.actions[0].dst, ContainerType::AllApps);

    let mut f = Fixture::portrait(UiState::Overview);
    let mut swipe = f.start_long_swipe();
    swipe.on_move(-600., &mut f.cx());
    f.clock.set_unadjusted(Duration::from_millis(300));
    swipe.end(2000., true, &mut f.cx());
    assert_eq!(swipe.plan().unwrap().target_state, UiState::Overview);

    f.settle_long_swipe(&mut swipe);
    assert_eq!(f.states.state(), UiState::Overview);
    assert_eq!(f.events.actions[0].touch, Touch::Fling);
    assert_eq!(f.events.actions[0].dst, ContainerType::TaskSwitcher);
}

#[test]
fn long_swipe_commits_on_release_with_animations_off() {
    let mut f = Fixture::portrait(UiState::Overview);
    f.clock.set_complete_instantly(true);
    let mut swipe = f.start_long_swipe();

    swipe.on_move(-500., &mut f.cx());
    assert!(swipe.end(0., false, &mut f.cx()));
    assert!(!swipe.is_running());
    assert_eq!(f.states.state(), UiState::AllItems);
    assert_eq!(f.events.actions.len(), 1);
}

#[test]
fn destroyed_long_swipe_returns_to_overview() {
    let mut f = Fixture::portrait(UiState::Overview);
    let mut swipe = f.start_long_swipe();
    swipe.on_move(-300., &mut f.cx());

    swipe.destroy(&mut f.cx());
    assert_eq!(f.states.state(), UiState::Overview);
    assert!(f.events.actions.is_empty());
    assert_eq!(f.host.overview_hints, 0);
}

proptest! {
    #[test]
    fn scrub_follows_displacement(
        mut steps in prop::collection::vec(1f64..600., 1..20),
        toward_overview: bool,
    ) {
        steps.sort_by(f64::total_cmp);

        let (state, sign) = if toward_overview {
            (UiState::Normal, -1.)
        } else {
            (UiState::Overview, 1.)
        };
        let mut f = Fixture::portrait(state);
        prop_assert!(f.down(edge_touch()));

        let mut last = f64::MIN;
        for step in steps {
            f.move_to(sign * step);
            let fraction = f.fraction();
            prop_assert!(fraction >= last);
            prop_assert!((0. ..=1.).contains(&fraction));
            last = fraction;
        }
    }
}
