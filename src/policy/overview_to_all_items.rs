use super::{
    all_items_down_target, can_intercept_in_all_items, Axis, CatchRule, OrientationPolicy,
    TouchEnvironment,
};
use crate::input::GestureSignal;
use crate::logging::ContainerType;
use crate::state::{TransitionGeometry, UiState};

/// Vertical swipes that only open and close the item list.
///
/// Used next to the landscape edge swipe, and on its own when swipe-up into the overview is
/// disabled.
#[derive(Debug, Clone, Copy)]
pub struct OverviewToAllItems {
    overview_available: bool,
}

impl OverviewToAllItems {
    pub fn new(overview_available: bool) -> Self {
        Self { overview_available }
    }
}

impl OrientationPolicy for OverviewToAllItems {
    fn name(&self) -> &'static str {
        "overview-to-all-items"
    }

    fn tracked_axis(&self) -> Axis {
        Axis::Vertical
    }

    fn can_intercept_touch(
        &self,
        signal: &GestureSignal,
        state: UiState,
        env: &dyn TouchEnvironment,
    ) -> bool {
        match state {
            UiState::AllItems => can_intercept_in_all_items(signal, env),
            UiState::Normal => true,
            UiState::Overview => env.is_below_overview_content(signal),
            UiState::QuickScrub => false,
        }
    }

    fn target_state(&self, from: UiState, toward_positive: bool, last_state: UiState) -> UiState {
        if from == UiState::AllItems && !toward_positive {
            all_items_down_target(self.overview_available, last_state)
        } else if toward_positive {
            UiState::AllItems
        } else {
            from
        }
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
