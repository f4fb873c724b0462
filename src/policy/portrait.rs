use super::{
    all_items_down_target, can_intercept_in_all_items, Axis, CatchRule, OrientationPolicy,
    TouchEnvironment,
};
use crate::input::GestureSignal;
use crate::logging::ContainerType;
use crate::state::{TransitionGeometry, UiState};

/// Vertical swipes in the portrait layout: home, overview and the item list stacked bottom to
/// top.
#[derive(Debug, Clone, Copy)]
pub struct Portrait {
    overview_available: bool,
}

impl Portrait {
    /// Without an overview, swiping up from home goes straight to the item list.
    pub fn new(overview_available: bool) -> Self {
        Self { overview_available }
    }
}

impl OrientationPolicy for Portrait {
    fn name(&self) -> &'static str {
        "portrait"
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
        if state == UiState::AllItems {
            can_intercept_in_all_items(signal, env)
        } else {
            // Elsewhere only touches starting over the bottom bar count.
            signal.edge_origin
        }
    }

    fn target_state(&self, from: UiState, toward_positive: bool, last_state: UiState) -> UiState {
        match (from, toward_positive) {
            (UiState::AllItems, false) => {
                all_items_down_target(self.overview_available, last_state)
            }
            (UiState::Overview, true) => UiState::AllItems,
            (UiState::Overview, false) => UiState::Normal,
            (UiState::Normal, true) if self.overview_available => UiState::Overview,
            (UiState::Normal, true) => UiState::AllItems,
            _ => from,
        }
    }

    fn shift_range(&self, geometry: &TransitionGeometry) -> f64 {
        geometry.vertical_shift_range
    }

    fn catch_rule(&self) -> CatchRule {
        CatchRule::BelowAnimatedPosition
    }

    fn normal_container(&self) -> ContainerType {
        ContainerType::Hotseat
    }

    fn supports_item_launch(&self) -> bool {
        true
    }
}
