//! Error types for supportcrew
//!
//! A single crate-wide error enum. Tool failures are the only errors the
//! orchestration protocols themselves produce; the rest come from the
//! ambient layers (configuration, HTTP adapter, serialization).

use thiserror::Error;

/// Main error type for the support agent system
#[derive(Error, Debug)]
pub enum AgentError {
    /// A tool gateway operation could not complete (transport, infra)
    #[error("Tool '{tool}' failed: {reason}")]
    ToolFailure { tool: String, reason: String },

    /// The tool service refused the call or answered with something unusable
    #[error("Tool '{tool}' rejected the call: {reason}")]
    ToolRejected { tool: String, reason: String },

    /// A tool gateway operation exceeded its deadline
    #[error("Tool '{tool}' timed out after {duration_ms}ms")]
    Timeout { tool: String, duration_ms: u64 },

    /// Work was submitted to an agent that is not accepting it
    #[error("Agent {agent_id} is {state} and cannot accept work")]
    SessionNotActive { agent_id: String, state: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

impl AgentError {
    /// Shorthand for a tool failure
    pub fn tool_failure(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        AgentError::ToolFailure {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentError::ToolFailure { .. } | AgentError::Timeout { .. } | AgentError::HttpError(_)
        )
    }
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Convert anyhow errors to AgentError
impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Generic(err.to_string())
    }
}
