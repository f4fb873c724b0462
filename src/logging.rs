//! Reporting completed state changes to the user event log.

use std::fmt;

use crate::state::UiState;

/// How the user moved the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touch {
    Swipe,
    Fling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The part of the UI an action started or ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Hotseat,
    Workspace,
    Navbar,
    AllApps,
    TaskSwitcher,
    App,
}

/// One completed gesture-driven state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangeAction {
    pub touch: Touch,
    pub direction: Direction,
    /// Where the touch landed, when it was not inside `src`.
    pub touch_target: Option<ContainerType>,
    pub src: ContainerType,
    pub dst: ContainerType,
    pub from_state: UiState,
    pub to_state: UiState,
}

/// Sink for user events. Calls are fire and forget.
pub trait UserEventDispatcher {
    fn log_state_change_action(&mut self, action: StateChangeAction);
}

/// Dispatcher that writes every action to the `tracing` log.
#[derive(Debug, Default)]
pub struct TracingDispatcher;

impl UserEventDispatcher for TracingDispatcher {
    fn log_state_change_action(&mut self, action: StateChangeAction) {
        info!("user event: {action}");
    }
}

/// Dispatcher that collects actions in memory.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub actions: Vec<StateChangeAction>,
}

impl UserEventDispatcher for RecordingDispatcher {
    fn log_state_change_action(&mut self, action: StateChangeAction) {
        self.actions.push(action);
    }
}

impl fmt::Display for Touch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Touch::Swipe => "SWIPE",
            Touch::Fling => "FLING",
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        })
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerType::Hotseat => "HOTSEAT",
            ContainerType::Workspace => "WORKSPACE",
            ContainerType::Navbar => "NAVBAR",
            ContainerType::AllApps => "ALLAPPS",
            ContainerType::TaskSwitcher => "TASKSWITCHER",
            ContainerType::App => "APP",
        })
    }
}

impl fmt::Display for StateChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.touch, self.direction)?;
        if let Some(target) = self.touch_target {
            write!(f, "on {target} ")?;
        }
        write!(
            f,
            "{}->{} ({} -> {})",
            self.src, self.dst, self.from_state, self.to_state
        )
    }
}
