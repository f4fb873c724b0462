use std::time::Duration;

/// Suppresses flings released right after a transition started.
///
/// When a transition is picked up mid-motion, the velocity tracker still carries the speed of
/// whatever the finger was doing before, and a quick release would read as a fling the user
/// never meant. Within the blocking window the release is judged by position only.
#[derive(Debug, Clone, Copy)]
pub struct FlingBlockCheck {
    window: Duration,
    blocked_since: Option<Duration>,
}

impl FlingBlockCheck {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            blocked_since: None,
        }
    }

    /// Starts the blocking window at `now`.
    pub fn block_fling(&mut self, now: Duration) {
        self.blocked_since = Some(now);
    }

    pub fn is_blocked(&self, now: Duration) -> bool {
        self.blocked_since
            .is_some_and(|since| now.saturating_sub(since) < self.window)
    }
}
