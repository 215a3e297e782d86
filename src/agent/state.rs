//! Session state machine
//!
//! Shared by agents and the orchestrator, each holding its own copy.
//! Transitions never fail:
//! - Active  → Paused  (on: Pause)
//! - Paused  → Active  (on: Resume)
//! - Pause on Paused and Resume on Active are no-ops
//! - Completed and Failed are terminal and ignore every event

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an agent or session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting work
    Active,

    /// Suspended until resumed
    Paused,

    /// Finished (terminal, reserved)
    Completed,

    /// Unrecoverable failure (terminal, reserved)
    Failed,
}

/// Events that drive session transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Pause,
    Resume,
}

impl SessionState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }

    /// Only active entities take new work
    pub fn accepts_work(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    /// Next state for `event`
    pub fn transition(&self, event: StateEvent) -> SessionState {
        use SessionState::*;

        if self.is_terminal() {
            return *self;
        }

        match event {
            StateEvent::Pause => Paused,
            StateEvent::Resume => Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Active
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
