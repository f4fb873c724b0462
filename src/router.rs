//! Picking the gesture controllers for a layout and routing touches between them.

use clap::ValueEnum;
use swipestate_config::Gestures;

use crate::animation::Clock;
use crate::input::GestureSignal;
use crate::policy::{Axis, LandscapeEdge, OrientationPolicy, OverviewToAllItems, Portrait};
use crate::transition::{ControllerConfig, StateTransitionController, TransitionCx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutMode {
    /// Navigation bar at the bottom.
    Portrait,
    /// Navigation bar on the right edge.
    Landscape,
    /// Navigation bar on the left edge.
    Seascape,
}

/// One touch callback reduced to both axes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub horizontal: GestureSignal,
    pub vertical: GestureSignal,
}

impl TouchEvent {
    pub fn along(&self, axis: Axis) -> &GestureSignal {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }
}

/// The transition controllers of one layout, in priority order.
///
/// Every controller interested in a touch going down takes it. The first one that sees movement
/// along its own axis claims the touch, and the others let go of it.
#[derive(Debug)]
pub struct GestureRouter {
    controllers: Vec<StateTransitionController>,
    /// Controllers holding the current touch while nobody has claimed it.
    candidates: Vec<usize>,
    /// Controller that claimed the current touch.
    active: Option<usize>,
}

impl GestureRouter {
    pub fn for_layout(mode: LayoutMode, config: &Gestures, clock: &Clock) -> Self {
        let policies: Vec<Box<dyn OrientationPolicy>> = if config.disable_swipe_up {
            vec![Box::new(OverviewToAllItems::new(true))]
        } else {
            match mode {
                LayoutMode::Portrait => vec![Box::new(Portrait::new(true))],
                LayoutMode::Landscape => vec![
                    Box::new(OverviewToAllItems::new(true)),
                    Box::new(LandscapeEdge::landscape()),
                ],
                LayoutMode::Seascape => vec![
                    Box::new(OverviewToAllItems::new(true)),
                    Box::new(LandscapeEdge::seascape()),
                ],
            }
        };

        let controller_config = ControllerConfig::from(config);
        let controllers = policies
            .into_iter()
            .map(|policy| StateTransitionController::new(policy, clock.clone(), controller_config))
            .collect::<Vec<_>>();

        debug!(
            "gesture controllers for {mode:?}: {:?}",
            controllers
                .iter()
                .map(|c| c.policy().name())
                .collect::<Vec<_>>()
        );

        Self {
            controllers,
            candidates: Vec::new(),
            active: None,
        }
    }

    pub fn controllers(&self) -> &[StateTransitionController] {
        &self.controllers
    }

    /// Controller that claimed the current touch, if any.
    pub fn active(&self) -> Option<&StateTransitionController> {
        self.active.map(|idx| &self.controllers[idx])
    }

    /// Whether some controller holds the current touch.
    pub fn is_tracking(&self) -> bool {
        self.active.is_some() || !self.candidates.is_empty()
    }

    /// Offers a touch going down to the controllers. Returns whether any of them took it.
    ///
    /// Whoever still holds a previous touch whose release never arrived lets go of it first.
    /// A controller with a live transition gets the touch first and alone. If it keeps the
    /// transition running while declining the touch, nobody else gets it either.
    pub fn on_gesture_start(&mut self, event: &TouchEvent, cx: &mut TransitionCx) -> bool {
        if self.is_tracking() {
            debug!("touch down while the previous touch is still held, cancelling it");
            self.cancel(cx);
        }

        if let Some(idx) = self.controllers.iter().position(|c| c.is_busy()) {
            if self.offer(idx, event, cx) {
                return true;
            }

            if self.controllers[idx].is_busy() {
                return false;
            }
        }

        for idx in 0..self.controllers.len() {
            self.offer(idx, event, cx);
        }

        !self.candidates.is_empty()
    }

    pub fn on_gesture_move(&mut self, event: &TouchEvent, cx: &mut TransitionCx) -> bool {
        if self.active.is_none() {
            let claimed = self.candidates.iter().copied().find(|&idx| {
                let axis = self.controllers[idx].policy().tracked_axis();
                event.along(axis).displacement != 0.
            });

            let Some(idx) = claimed else {
                return !self.candidates.is_empty();
            };

            for other in self.candidates.drain(..).filter(|&other| other != idx) {
                self.controllers[other].cancel(cx);
            }

            trace!("touch claimed by {}", self.controllers[idx].policy().name());
            self.active = Some(idx);
        }

        let Some(idx) = self.active else {
            return false;
        };

        let controller = &mut self.controllers[idx];
        let signal = event.along(controller.policy().tracked_axis());
        controller.on_gesture_move(signal, cx)
    }

    pub fn on_gesture_end(&mut self, event: &TouchEvent, cx: &mut TransitionCx) -> bool {
        let Some(idx) = self.active.take() else {
            // Nobody saw movement, so everyone just lets go.
            let mut consumed = false;
            for idx in self.candidates.drain(..) {
                let controller = &mut self.controllers[idx];
                let signal = event.along(controller.policy().tracked_axis());
                consumed |= controller.on_gesture_end(signal, cx);
            }
            return consumed;
        };

        let controller = &mut self.controllers[idx];
        let signal = event.along(controller.policy().tracked_axis());
        controller.on_gesture_end(signal, cx)
    }

    pub fn cancel(&mut self, cx: &mut TransitionCx) {
        for idx in self.active.take().into_iter().chain(self.candidates.drain(..)) {
            self.controllers[idx].cancel(cx);
        }
    }

    /// Advances settling transitions. Returns whether any of them committed.
    pub fn advance_animations(&mut self, cx: &mut TransitionCx) -> bool {
        let mut committed = false;
        for controller in &mut self.controllers {
            committed |= controller.advance_animations(cx);
        }
        committed
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.controllers.iter().any(|c| c.are_animations_ongoing())
    }

    fn offer(&mut self, idx: usize, event: &TouchEvent, cx: &mut TransitionCx) -> bool {
        let controller = &mut self.controllers[idx];
        let signal = event.along(controller.policy().tracked_axis());
        let taken = controller.on_gesture_start(signal, cx);
        if taken {
            self.candidates.push(idx);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::logging::RecordingDispatcher;
    use crate::policy::tests::{geometry, FixedEnvironment};
    use crate::state::{StateManager, TransitionGeometry, UiState};
    use crate::transition::{AnimatorPlan, ControllerPhase, TransitionHost};

    struct Host;

    impl TransitionHost for Host {
        fn geometry(&self) -> TransitionGeometry {
            geometry()
        }

        fn apply_fraction(&mut self, _plan: &AnimatorPlan, _fraction: f64) {}
    }

    fn names(router: &GestureRouter) -> Vec<&'static str> {
        router
            .controllers()
            .iter()
            .map(|c| c.policy().name())
            .collect()
    }

    #[test]
    fn controllers_per_layout() {
        let clock = Clock::with_time(Duration::ZERO);
        let config = Gestures::default();

        let router = GestureRouter::for_layout(LayoutMode::Portrait, &config, &clock);
        assert_eq!(names(&router), ["portrait"]);

        let router = GestureRouter::for_layout(LayoutMode::Landscape, &config, &clock);
        assert_eq!(names(&router), ["overview-to-all-items", "landscape-edge"]);

        let router = GestureRouter::for_layout(LayoutMode::Seascape, &config, &clock);
        assert_eq!(names(&router), ["overview-to-all-items", "seascape-edge"]);

        let config = Gestures {
            disable_swipe_up: true,
            ..config
        };
        for mode in [
            LayoutMode::Portrait,
            LayoutMode::Landscape,
            LayoutMode::Seascape,
        ] {
            let router = GestureRouter::for_layout(mode, &config, &clock);
            assert_eq!(names(&router), ["overview-to-all-items"]);
        }
    }

    struct Fixture {
        clock: Clock,
        states: StateManager,
        host: Host,
        env: FixedEnvironment,
        events: RecordingDispatcher,
        router: GestureRouter,
    }

    impl Fixture {
        fn new(mode: LayoutMode) -> Self {
            let clock = Clock::with_time(Duration::ZERO);
            let router = GestureRouter::for_layout(mode, &Gestures::default(), &clock);
            Self {
                clock,
                states: StateManager::new(UiState::Normal),
                host: Host,
                env: FixedEnvironment::default(),
                events: RecordingDispatcher::default(),
                router,
            }
        }

        fn with_cx<R>(
            &mut self,
            f: impl FnOnce(&mut GestureRouter, &mut TransitionCx<'_>) -> R,
        ) -> R {
            let mut cx = TransitionCx {
                states: &mut self.states,
                host: &mut self.host,
                env: &self.env,
                events: &mut self.events,
            };
            f(&mut self.router, &mut cx)
        }

        fn down(&mut self, event: TouchEvent) -> bool {
            self.with_cx(|router, cx| router.on_gesture_start(&event, cx))
        }

        fn move_by(&mut self, event: TouchEvent) -> bool {
            self.with_cx(|router, cx| router.on_gesture_move(&event, cx))
        }

        fn up(&mut self, event: TouchEvent) -> bool {
            self.with_cx(|router, cx| router.on_gesture_end(&event, cx))
        }

        fn advance_to(&mut self, ms: u64) -> bool {
            self.clock.set_unadjusted(Duration::from_millis(ms));
            self.with_cx(|router, cx| router.advance_animations(cx))
        }

        fn phases(&self) -> Vec<ControllerPhase> {
            self.router.controllers().iter().map(|c| c.phase()).collect()
        }
    }

    fn nav_bar_down() -> TouchEvent {
        TouchEvent {
            horizontal: GestureSignal::down(590.).with_edge_origin(),
            vertical: GestureSignal::down(300.),
        }
    }

    #[test]
    fn landscape_edge_swipe_reaches_overview() {
        let mut f = Fixture::new(LayoutMode::Landscape);

        // Both controllers are interested in a nav bar touch in the normal state.
        assert!(f.down(nav_bar_down()));
        assert_eq!(
            f.phases(),
            [ControllerPhase::Intercepted, ControllerPhase::Intercepted]
        );
        assert!(f.router.active().is_none());

        // Horizontal movement is claimed by the edge controller.
        assert!(f.move_by(TouchEvent {
            horizontal: GestureSignal::moved(-200., 0.),
            vertical: GestureSignal::moved(0., 0.),
        }));
        assert_eq!(f.router.active().unwrap().policy().name(), "landscape-edge");
        assert_eq!(
            f.phases(),
            [ControllerPhase::Idle, ControllerPhase::Dragging]
        );

        f.clock.set_unadjusted(Duration::from_millis(300));
        assert!(f.up(TouchEvent {
            horizontal: GestureSignal::released(-200., 0., false),
            vertical: GestureSignal::default(),
        }));
        assert!(!f.router.is_tracking());
        assert!(f.router.are_animations_ongoing());

        assert!(f.advance_to(1000));
        assert_eq!(f.states.state(), UiState::Overview);
        assert_eq!(f.events.actions.len(), 1);
        assert_eq!(f.events.actions[0].direction, crate::logging::Direction::Left);
    }

    #[test]
    fn vertical_movement_goes_to_the_item_list() {
        let mut f = Fixture::new(LayoutMode::Landscape);

        assert!(f.down(nav_bar_down()));
        assert!(f.move_by(TouchEvent {
            horizontal: GestureSignal::moved(0., 0.),
            vertical: GestureSignal::moved(-100., 0.),
        }));
        assert_eq!(
            f.router.active().unwrap().policy().name(),
            "overview-to-all-items"
        );
        assert_eq!(
            f.phases(),
            [ControllerPhase::Dragging, ControllerPhase::Idle]
        );
    }

    #[test]
    fn release_without_movement_frees_every_candidate() {
        let mut f = Fixture::new(LayoutMode::Seascape);

        assert!(f.down(TouchEvent {
            horizontal: GestureSignal::down(10.).with_edge_origin(),
            vertical: GestureSignal::down(300.),
        }));
        assert!(f.up(TouchEvent::default()));
        assert_eq!(f.phases(), [ControllerPhase::Idle, ControllerPhase::Idle]);
        assert!(!f.router.is_tracking());
    }

    #[test]
    fn settling_controller_gets_the_next_touch() {
        let mut f = Fixture::new(LayoutMode::Seascape);

        let down = TouchEvent {
            vertical: GestureSignal::down(500.),
            ..Default::default()
        };
        assert!(f.down(down));
        f.move_by(TouchEvent {
            vertical: GestureSignal::moved(-600., 0.),
            ..Default::default()
        });
        f.up(TouchEvent::default());
        assert_eq!(f.phases()[0], ControllerPhase::Settling);

        assert!(!f.advance_to(50));

        // Caught by the settling controller, even though the edge controller would take this
        // touch too.
        let edge_down = TouchEvent {
            horizontal: GestureSignal::down(10.).with_edge_origin(),
            ..down
        };
        assert!(f.down(edge_down));
        assert_eq!(
            f.phases(),
            [ControllerPhase::Intercepted, ControllerPhase::Idle]
        );
    }

    #[test]
    fn lost_release_does_not_block_later_touches() {
        let mut f = Fixture::new(LayoutMode::Portrait);
        let down = TouchEvent {
            vertical: GestureSignal::down(990.).with_edge_origin(),
            ..Default::default()
        };

        // Touch goes down and its release never arrives.
        assert!(f.down(down));
        for _ in 0..3 {
            assert!(f.down(down));
            assert_eq!(f.phases(), [ControllerPhase::Intercepted]);
        }

        // Same for a touch that was already dragging; its transition is dropped uncommitted.
        f.move_by(TouchEvent {
            vertical: GestureSignal::moved(-100., 0.),
            ..Default::default()
        });
        assert_eq!(f.phases(), [ControllerPhase::Dragging]);
        assert!(f.down(down));
        assert_eq!(f.phases(), [ControllerPhase::Intercepted]);
        assert_eq!(f.states.state(), UiState::Normal);
        assert!(f.events.actions.is_empty());

        assert!(f.move_by(TouchEvent {
            vertical: GestureSignal::moved(-200., 0.),
            ..Default::default()
        }));
        f.up(TouchEvent {
            vertical: GestureSignal::released(-200., 0., false),
            ..Default::default()
        });
        assert!(f.advance_to(1000));
        assert_eq!(f.states.state(), UiState::Overview);
    }

    #[test]
    fn blocking_overlay_stops_every_controller() {
        let mut f = Fixture::new(LayoutMode::Landscape);
        f.env.blocking_overlay = true;

        assert!(!f.down(nav_bar_down()));
        assert!(!f.router.is_tracking());
    }
}
