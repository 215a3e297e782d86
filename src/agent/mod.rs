//! Agent orchestration module
//!
//! Session state machine, role-bound agents and the orchestrator that
//! drives them.

pub mod state;
pub mod worker;
pub mod orchestrator;

// Re-export commonly used types
pub use state::{SessionState, StateEvent};
pub use worker::{Agent, AgentRole};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
