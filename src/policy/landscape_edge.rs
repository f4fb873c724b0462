use super::{Axis, CatchRule, OrientationPolicy, TouchEnvironment};
use crate::input::GestureSignal;
use crate::logging::{ContainerType, Direction};
use crate::state::{TransitionGeometry, UiState};

/// Horizontal swipes from the navigation bar in the vertical-bar layouts.
///
/// In landscape the bar sits on the right edge; in seascape on the left, and everything is
/// mirrored.
#[derive(Debug, Clone, Copy)]
pub struct LandscapeEdge {
    seascape: bool,
}

impl LandscapeEdge {
    pub fn landscape() -> Self {
        Self { seascape: false }
    }

    pub fn seascape() -> Self {
        Self { seascape: true }
    }
}

impl OrientationPolicy for LandscapeEdge {
    fn name(&self) -> &'static str {
        if self.seascape {
            "seascape-edge"
        } else {
            "landscape-edge"
        }
    }

    fn tracked_axis(&self) -> Axis {
        Axis::Horizontal
    }

    fn can_intercept_touch(
        &self,
        signal: &GestureSignal,
        state: UiState,
        _env: &dyn TouchEnvironment,
    ) -> bool {
        state == UiState::Normal && signal.edge_origin
    }

    fn target_state(&self, _from: UiState, toward_positive: bool, _last_state: UiState) -> UiState {
        let dragging_from_nav_bar = self.seascape != toward_positive;
        if dragging_from_nav_bar {
            UiState::Overview
        } else {
            UiState::Normal
        }
    }

    fn shift_range(&self, geometry: &TransitionGeometry) -> f64 {
        geometry.horizontal_shift_range
    }

    /// Half the screen width, pointing away from the bar, whatever the state pair.
    fn travel_distance(&self, _from: UiState, _to: UiState, geometry: &TransitionGeometry) -> f64 {
        let half = self.shift_range(geometry) / 2.;
        if self.seascape {
            half
        } else {
            -half
        }
    }

    fn catch_rule(&self) -> CatchRule {
        CatchRule::Always
    }

    fn normal_container(&self) -> ContainerType {
        ContainerType::Navbar
    }

    fn overshoots_first_swipe(&self) -> bool {
        false
    }

    fn log_direction(&self) -> Option<Direction> {
        Some(if self.seascape {
            Direction::Right
        } else {
            Direction::Left
        })
    }
}
