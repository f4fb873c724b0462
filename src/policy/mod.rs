//! Direction-dependent gesture rules, one implementation per layout mode.
//!
//! A policy answers the questions the transition controller cannot answer on its own: which axis
//! to track, whether a touch is ours to take, which state a drag in a given direction leads to,
//! and how far the finger has to travel for a full transition. Policies hold no per-gesture state,
//! so one instance is shared by every session of the controller that owns it.

use std::fmt;

use crate::input::GestureSignal;
use crate::logging::{ContainerType, Direction};
use crate::state::{TransitionGeometry, UiState};

mod landscape_edge;
mod overview_to_all_items;
mod portrait;

pub use self::landscape_edge::LandscapeEdge;
pub use self::overview_to_all_items::OverviewToAllItems;
pub use self::portrait::Portrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// When a new touch may take over a transition that is still settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchRule {
    /// Any touch catches the transition.
    Always,
    /// Only touches at or beyond the currently animated position catch it.
    ///
    /// Touches above it are left to the content underneath, e.g. to scroll the overview.
    BelowAnimatedPosition,
}

/// Predicates about the surrounding UI that decide whether a touch may start a transition.
pub trait TouchEnvironment {
    /// Whether a floating view (popup, dialog) is open on top and owns input.
    fn has_blocking_overlay(&self) -> bool;

    /// Whether the item list is scrolled to its edge so the touch should move the whole list
    /// rather than scroll its content.
    fn list_container_should_move(&self, signal: &GestureSignal) -> bool;

    /// Whether the touch is below the task cards of the overview.
    fn is_below_overview_content(&self, signal: &GestureSignal) -> bool;
}

pub trait OrientationPolicy: fmt::Debug {
    /// Human-readable policy name for logs.
    fn name(&self) -> &'static str;

    fn tracked_axis(&self) -> Axis;

    /// Whether an idle controller should take a touch that starts in `state`.
    ///
    /// Blocking overlays are checked by the controller before this is called.
    fn can_intercept_touch(
        &self,
        signal: &GestureSignal,
        state: UiState,
        env: &dyn TouchEnvironment,
    ) -> bool;

    /// The state a drag starting in `from` leads to.
    ///
    /// Returning `from` means the drag has nowhere to go.
    fn target_state(&self, from: UiState, toward_positive: bool, last_state: UiState) -> UiState;

    /// Physical extent of the tracked axis that the state positions are expressed against.
    fn shift_range(&self, geometry: &TransitionGeometry) -> f64;

    /// Position of `state` along the tracked axis, in logical pixels.
    fn state_position(&self, state: UiState, geometry: &TransitionGeometry) -> f64 {
        state.vertical_progress(geometry) * self.shift_range(geometry)
    }

    /// Signed displacement that takes the transition from `from` (fraction 0) to `to` (fraction
    /// 1). Zero when the two states sit at the same position.
    fn travel_distance(&self, from: UiState, to: UiState, geometry: &TransitionGeometry) -> f64 {
        self.state_position(to, geometry) - self.state_position(from, geometry)
    }

    /// Travel used in place of a zero travel distance, so that progress still follows the
    /// finger and durations stay finite.
    fn fallback_distance(&self, from: UiState, to: UiState, geometry: &TransitionGeometry) -> f64 {
        let height = if geometry.overview_swipe_height > 0. {
            geometry.overview_swipe_height
        } else {
            self.shift_range(geometry).abs().max(1.)
        };

        // Towards a higher state means up, which is negative screen displacement.
        if from.ordinal() > to.ordinal() {
            height
        } else {
            -height
        }
    }

    /// Whether a displacement moves towards the "positive" end of the policy's state chain.
    ///
    /// Positive means up on the vertical axis, and away from the right edge on the horizontal
    /// axis.
    fn is_drag_toward_positive(&self, displacement: f64) -> bool {
        displacement < 0.
    }

    fn catch_rule(&self) -> CatchRule;

    /// The state a swipe is moving "away" to; a blocked fling settling anywhere else gets an
    /// overshoot.
    fn away_state(&self) -> UiState {
        UiState::AllItems
    }

    /// Log container used for the normal state.
    fn normal_container(&self) -> ContainerType;

    /// Fixed log direction, if the policy has one.
    fn log_direction(&self) -> Option<Direction> {
        None
    }

    /// Whether a first swipe from home into the overview overshoots on a fling, and makes the
    /// next touch finish the settle immediately.
    fn overshoots_first_swipe(&self) -> bool {
        true
    }

    /// Whether swiping down from the overview may launch the focused item.
    fn supports_item_launch(&self) -> bool {
        false
    }
}

/// Target states shared by the vertical policies when swiping down from the item list.
fn all_items_down_target(overview_available: bool, last_state: UiState) -> UiState {
    if overview_available && last_state != UiState::AllItems && !last_state.is_transient() {
        last_state
    } else {
        UiState::Normal
    }
}

/// Interception in the item list, shared by the vertical policies.
fn can_intercept_in_all_items(signal: &GestureSignal, env: &dyn TouchEnvironment) -> bool {
    env.list_container_should_move(signal)
}
