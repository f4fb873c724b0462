//! The discrete UI states and the bookkeeping of which one is current.

use std::fmt;

use bitflags::bitflags;

mod listener;

pub use self::listener::{DiscoveryHints, StateChangeListener};

bitflags! {
    /// Properties a state declares about how it looks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StateFlags: u8 {
        /// The state shows the overview (task switcher) UI.
        const OVERVIEW_UI = 1 << 0;
        /// System chrome such as the back button is hidden.
        const HIDE_CHROME = 1 << 1;
        /// The state is entered programmatically and is never a gesture target.
        const TRANSIENT = 1 << 2;
    }
}

/// A discrete UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiState {
    /// The home screen.
    Normal,
    /// The task switcher overview.
    Overview,
    /// Overview while quickly scrubbing through tasks.
    QuickScrub,
    /// The full list of items.
    AllItems,
}

/// Geometry the rendering layer reports for the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionGeometry {
    /// Vertical distance between the all-items list fully open and fully closed.
    pub vertical_shift_range: f64,
    /// Horizontal extent of the screen.
    pub horizontal_shift_range: f64,
    /// Vertical distance of the default swipe from the normal state into the overview.
    pub overview_swipe_height: f64,
}

impl UiState {
    pub fn ordinal(self) -> u8 {
        match self {
            UiState::Normal => 0,
            UiState::Overview => 2,
            UiState::QuickScrub => 3,
            UiState::AllItems => 4,
        }
    }

    pub fn flags(self) -> StateFlags {
        match self {
            UiState::Normal => StateFlags::HIDE_CHROME,
            UiState::Overview => StateFlags::OVERVIEW_UI,
            UiState::QuickScrub => {
                StateFlags::OVERVIEW_UI | StateFlags::HIDE_CHROME | StateFlags::TRANSIENT
            }
            UiState::AllItems => StateFlags::empty(),
        }
    }

    pub fn is_overview_ui(self) -> bool {
        self.flags().contains(StateFlags::OVERVIEW_UI)
    }

    pub fn hides_chrome(self) -> bool {
        self.flags().contains(StateFlags::HIDE_CHROME)
    }

    pub fn is_transient(self) -> bool {
        self.flags().contains(StateFlags::TRANSIENT)
    }

    /// Position of the all-items panel for this state: 1 is fully closed, 0 is fully open.
    pub fn vertical_progress(self, geometry: &TransitionGeometry) -> f64 {
        match self {
            UiState::Normal => 1.,
            UiState::AllItems => 0.,
            UiState::Overview | UiState::QuickScrub => {
                if geometry.vertical_shift_range <= 0. {
                    return 1.;
                }
                let progress = 1. - geometry.overview_swipe_height / geometry.vertical_shift_range;
                progress.clamp(0., 1.)
            }
        }
    }

    /// Returns whether a gesture may take the UI from this state to `other`.
    pub fn can_transition_to(self, other: UiState) -> bool {
        self != other && !self.is_transient() && !other.is_transient()
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiState::Normal => "normal",
            UiState::Overview => "overview",
            UiState::QuickScrub => "quick-scrub",
            UiState::AllItems => "all-items",
        };
        f.write_str(name)
    }
}

/// Owns the committed UI state and notifies listeners when it changes.
pub struct StateManager {
    state: UiState,
    last_state: UiState,
    listeners: Vec<Box<dyn StateChangeListener>>,
}

impl StateManager {
    pub fn new(state: UiState) -> Self {
        Self {
            state,
            last_state: state,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// The state that was current before the last committed change.
    pub fn last_state(&self) -> UiState {
        self.last_state
    }

    pub fn is_in_state(&self, state: UiState) -> bool {
        self.state == state
    }

    pub fn add_listener(&mut self, listener: Box<dyn StateChangeListener>) {
        self.listeners.push(listener);
    }

    /// Tells listeners that a transition towards `target` has started.
    pub fn dispatch_transition_start(&mut self, target: UiState) {
        trace!("transition towards {target} started");
        for listener in &mut self.listeners {
            listener.on_state_transition_start(target);
        }
    }

    /// Commits `state` and tells listeners about it.
    ///
    /// Committing the current state again still notifies listeners, since a transition that
    /// settled back where it started has still completed.
    pub fn go_to_state(&mut self, state: UiState) {
        if state != self.state {
            debug!("state changed: {} -> {state}", self.state);
            self.last_state = self.state;
            self.state = state;
        }

        let previous = self.last_state;
        for listener in &mut self.listeners {
            listener.on_state_committed(state, previous);
        }

        self.listeners.retain(|listener| !listener.is_finished());
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("state", &self.state)
            .field("last_state", &self.last_state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
