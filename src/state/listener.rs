use super::UiState;

/// Receives state transition events.
pub trait StateChangeListener {
    /// A gesture started moving the UI towards `target`.
    fn on_state_transition_start(&mut self, target: UiState) {
        let _ = target;
    }

    /// The UI settled in `state`. `previous` is the state committed before it.
    fn on_state_committed(&mut self, state: UiState, previous: UiState);

    /// Once this returns true the listener is dropped after the current notification.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Remembers whether the user has discovered the swipe gestures, so first-run hints can stop
/// bouncing the UI at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryHints {
    swipe_up_enabled: bool,
    home_bounce_seen: bool,
    shelf_bounce_seen: bool,
}

impl DiscoveryHints {
    pub fn new(swipe_up_enabled: bool) -> Self {
        Self {
            swipe_up_enabled,
            home_bounce_seen: false,
            shelf_bounce_seen: false,
        }
    }

    /// Whether the user has swiped up from the home screen.
    pub fn home_bounce_seen(&self) -> bool {
        self.home_bounce_seen
    }

    /// Whether the user has swiped from the overview into the item list.
    pub fn shelf_bounce_seen(&self) -> bool {
        self.shelf_bounce_seen
    }
}

impl StateChangeListener for DiscoveryHints {
    fn on_state_committed(&mut self, state: UiState, previous: UiState) {
        if !self.home_bounce_seen {
            let discovered = if self.swipe_up_enabled {
                state == UiState::Overview
            } else {
                state == UiState::AllItems && previous == UiState::Normal
            };

            if discovered {
                debug!("home bounce discovered");
                self.home_bounce_seen = true;
            }
        }

        if !self.shelf_bounce_seen && state == UiState::AllItems && previous == UiState::Overview {
            debug!("shelf bounce discovered");
            self.shelf_bounce_seen = true;
        }
    }
}
