//! Which visual properties a transition animates, and how.

use crate::animation::{ClampedCurve, Curve};
use crate::state::UiState;

/// Progress at which the item list is fully visible when swiping up from the overview.
const ALL_ITEMS_CONTENT_FADE_THRESHOLD: f64 = 0.08;
/// Progress at which the overview starts fading out when swiping up from it.
const OVERVIEW_FADE_THRESHOLD: f64 = 0.88;

/// Identifies an item the host can launch, e.g. the focused task in the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u64);

/// A visual property driven by transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedProperty {
    /// Vertical position of the item list panel.
    VerticalProgress,
    /// Opacity of the item list content.
    AllItemsFade,
    /// Opacity of the overview.
    OverviewFade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyAnimation {
    pub property: AnimatedProperty,
    pub curve: ClampedCurve,
}

/// Immutable description of what a transition animates.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorPlan {
    /// The two states sit at the same position; nothing moves.
    Empty,
    /// Animate the state properties between two states.
    States {
        from: UiState,
        to: UiState,
        properties: Vec<PropertyAnimation>,
    },
    /// Zoom the given item open instead of changing states visually.
    LaunchItem(ItemId),
}

impl AnimatorPlan {
    pub fn properties(&self) -> &[PropertyAnimation] {
        match self {
            AnimatorPlan::States { properties, .. } => properties,
            AnimatorPlan::Empty | AnimatorPlan::LaunchItem(_) => &[],
        }
    }

    /// Eased value of `property` at transition progress `fraction`, if the plan animates it.
    pub fn value(&self, property: AnimatedProperty, fraction: f64) -> Option<f64> {
        self.properties()
            .iter()
            .find(|anim| anim.property == property)
            .map(|anim| anim.curve.y(fraction))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AnimatorPlan::Empty)
    }
}

/// Builds the animator plan for a transition from `from` to `to`.
pub fn animator_plan(from: UiState, to: UiState) -> AnimatorPlan {
    use AnimatedProperty::*;

    let anim = |property, curve| PropertyAnimation { property, curve };

    let properties = match (from, to) {
        (UiState::Normal, UiState::Overview) => {
            vec![anim(VerticalProgress, ClampedCurve::full(Curve::Linear))]
        }
        (UiState::Overview, UiState::AllItems) => vec![
            anim(VerticalProgress, ClampedCurve::full(Curve::Linear)),
            anim(
                AllItemsFade,
                ClampedCurve::new(Curve::EaseInQuad, 0., ALL_ITEMS_CONTENT_FADE_THRESHOLD),
            ),
            anim(
                OverviewFade,
                ClampedCurve::new(Curve::EaseOutQuad, OVERVIEW_FADE_THRESHOLD, 1.),
            ),
        ],
        (UiState::AllItems, UiState::Overview) => vec![
            anim(VerticalProgress, ClampedCurve::full(Curve::Linear)),
            anim(
                AllItemsFade,
                ClampedCurve::new(Curve::EaseOutQuad, 1. - ALL_ITEMS_CONTENT_FADE_THRESHOLD, 1.),
            ),
            anim(
                OverviewFade,
                ClampedCurve::new(Curve::EaseInQuad, 0., 1. - OVERVIEW_FADE_THRESHOLD),
            ),
        ],
        _ if from == to => return AnimatorPlan::Empty,
        _ => vec![anim(VerticalProgress, ClampedCurve::full(Curve::Linear))],
    };

    AnimatorPlan::States {
        from,
        to,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn overview_to_all_items_fades() {
        let plan = animator_plan(UiState::Overview, UiState::AllItems);

        // Item list content is fully visible early.
        assert_eq!(plan.value(AnimatedProperty::AllItemsFade, 0.), Some(0.));
        assert_eq!(plan.value(AnimatedProperty::AllItemsFade, 0.08), Some(1.));
        assert_eq!(plan.value(AnimatedProperty::AllItemsFade, 0.5), Some(1.));

        // The overview only fades at the very end.
        assert_eq!(plan.value(AnimatedProperty::OverviewFade, 0.5), Some(0.));
        assert_eq!(plan.value(AnimatedProperty::OverviewFade, 1.), Some(1.));

        let halfway = plan.value(AnimatedProperty::OverviewFade, 0.94).unwrap();
        assert_abs_diff_eq!(halfway, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn all_items_to_overview_is_reversed() {
        let plan = animator_plan(UiState::AllItems, UiState::Overview);
        assert_eq!(plan.value(AnimatedProperty::OverviewFade, 0.13), Some(1.));
        assert_eq!(plan.value(AnimatedProperty::AllItemsFade, 0.9), Some(0.));
        assert_eq!(plan.value(AnimatedProperty::AllItemsFade, 1.), Some(1.));
    }

    #[test]
    fn normal_to_overview_only_moves_vertically() {
        let plan = animator_plan(UiState::Normal, UiState::Overview);
        assert_eq!(plan.properties().len(), 1);
        assert_eq!(plan.value(AnimatedProperty::VerticalProgress, 0.3), Some(0.3));
        assert_eq!(plan.value(AnimatedProperty::OverviewFade, 0.3), None);
    }

    #[test]
    fn same_state_is_empty() {
        assert!(animator_plan(UiState::Overview, UiState::Overview).is_empty());
        assert!(AnimatorPlan::LaunchItem(ItemId(3)).properties().is_empty());
    }
}
