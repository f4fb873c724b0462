use crate::FloatOrInt;

/// Tuning of the swipe completion heuristics.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Gestures {
    /// Upper bound for any settle animation.
    #[knuffel(child, unwrap(argument), default = Self::default().max_swipe_duration_ms)]
    pub max_swipe_duration_ms: u32,
    /// Lower bound for a settle that overshoots.
    #[knuffel(child, unwrap(argument), default = Self::default().min_overshoot_duration_ms)]
    pub min_overshoot_duration_ms: u32,
    /// Cap for the first swipe into the overview when it overshoots after a fling.
    #[knuffel(child, unwrap(argument), default = Self::default().atomic_duration_ms)]
    pub atomic_duration_ms: u32,
    /// Flings released this soon after the transition started are treated as drags.
    #[knuffel(child, unwrap(argument), default = Self::default().fling_block_ms)]
    pub fling_block_ms: u32,
    /// Velocity in logical pixels per second below which a fling keeps its target but not its
    /// speed.
    #[knuffel(child, unwrap(argument), default = Self::default().min_fling_velocity)]
    pub min_fling_velocity: FloatOrInt<0, 65535>,
    /// Progress past which a released drag completes instead of going back.
    #[knuffel(child, unwrap(argument), default = Self::default().swipe_threshold)]
    pub swipe_threshold: FloatOrInt<0, 1>,
    /// How far before the animated position a new touch may land and still catch a settling
    /// transition.
    #[knuffel(child, unwrap(argument), default = Self::default().catch_tolerance)]
    pub catch_tolerance: FloatOrInt<0, 65535>,
    /// Lets the scrubbed progress leave the [0, 1] range.
    #[knuffel(child)]
    pub allow_overscroll: bool,
    /// Turns off swiping up from the normal state into the overview.
    #[knuffel(child)]
    pub disable_swipe_up: bool,
}

impl Default for Gestures {
    fn default() -> Self {
        Self {
            max_swipe_duration_ms: 350,
            min_overshoot_duration_ms: 120,
            atomic_duration_ms: 200,
            fling_block_ms: 200,
            min_fling_velocity: FloatOrInt(500.),
            swipe_threshold: FloatOrInt(0.5),
            catch_tolerance: FloatOrInt(0.),
            allow_overscroll: false,
            disable_swipe_up: false,
        }
    }
}
