//! supportcrew - Multi-agent customer support orchestration
//!
//! Three role-bound agents (router, support, escalation) share one
//! in-process memory bank and one tool gateway. The orchestrator drives
//! them in parallel (fan-out/fan-in with per-agent failure isolation) or
//! as a fail-fast pipeline, and can pause and resume the whole session.
//!
//! # Architecture
//!
//! - **memory**: per-session append-only interaction log
//! - **tools**: async capability trait with simulated, HTTP and stub backends
//! - **agent**: session state machine, agents, orchestrator
//! - **telemetry**: tracing setup and orchestration event counters

pub mod errors;
pub mod clock;
pub mod types;
pub mod memory;
pub mod tools;
pub mod agent;
pub mod telemetry;
pub mod config;
pub mod cli;

// Re-export commonly used types
pub use errors::{AgentError, Result};
pub use agent::{Agent, AgentRole, Orchestrator, SessionState};
pub use memory::MemoryBank;
