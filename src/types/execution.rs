//! Response envelopes returned by the orchestrator
//!
//! The parallel protocol never fails as a whole; each agent slot carries
//! either the agent's answer or the error it hit. The sequential protocol
//! either returns a full `EscalationResult` or an error.

use crate::agent::SessionState;
use crate::errors::AgentError;
use crate::memory::ContextSummary;
use crate::tools::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Error captured in place of an agent's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_id: String,
    pub error: String,
}

impl AgentFailure {
    pub fn new(agent_id: impl Into<String>, error: &AgentError) -> Self {
        Self {
            agent_id: agent_id.into(),
            error: error.to_string(),
        }
    }
}

/// Answer or captured failure for one agent slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentOutcome {
    Response(String),
    Failed(AgentFailure),
}

impl AgentOutcome {
    /// Capture an agent's result without propagating its error
    pub fn capture(agent_id: &str, result: crate::errors::Result<String>) -> Self {
        match result {
            Ok(response) => AgentOutcome::Response(response),
            Err(e) => AgentOutcome::Failed(AgentFailure::new(agent_id, &e)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentOutcome::Response(_))
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            AgentOutcome::Response(r) => Some(r.as_str()),
            AgentOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AgentFailure> {
        match self {
            AgentOutcome::Response(_) => None,
            AgentOutcome::Failed(f) => Some(f),
        }
    }
}

/// Envelope for the parallel protocol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerResponse {
    pub session_id: String,
    pub routing_response: AgentOutcome,
    pub support_response: AgentOutcome,
    pub timestamp: DateTime<Utc>,
}

impl CustomerResponse {
    /// Whether every agent answered
    pub fn is_complete_success(&self) -> bool {
        self.routing_response.is_success() && self.support_response.is_success()
    }
}

/// Result of the sequential escalation pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationResult {
    pub routing: String,
    pub support: String,
    pub escalation: String,
    pub ticket: Ticket,
}

/// Observability snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub session_id: String,
    pub state: SessionState,
    #[serde(serialize_with = "empty_object_when_none")]
    pub memory_metrics: Option<ContextSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Serialize a missing summary as `{}`
fn empty_object_when_none<S>(value: &Option<ContextSummary>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(summary) => summary.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}
