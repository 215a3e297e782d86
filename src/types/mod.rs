//! Type definitions module
//!
//! Messages, stored interactions and the response envelopes the
//! orchestrator hands back to callers.

pub mod messages;
pub use messages::{AgentMessage, Interaction, InteractionRecord, MessageKind};

pub mod execution;
pub use execution::{AgentFailure, AgentOutcome, CustomerResponse, EscalationResult, SessionMetrics};
