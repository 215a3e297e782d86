//! Message and interaction types
//!
//! `AgentMessage` is what an agent says; `Interaction` is what the memory
//! bank stores. Both are immutable once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of agent message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Query,
    Response,
    ToolCall,
}

/// A single message produced by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Agent that produced the message
    pub agent_id: String,

    /// Message body
    pub content: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Message kind
    pub kind: MessageKind,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AgentMessage {
    pub fn new(
        agent_id: impl Into<String>,
        content: impl Into<String>,
        kind: MessageKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            content: content.into(),
            created_at,
            kind,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// An interaction as stored in the memory bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    /// An agent received a query
    Query { message: AgentMessage, role: String },

    /// An agent answered a query
    Response {
        message: AgentMessage,
        tool_used: String,
    },

    /// A support ticket was opened
    TicketCreated {
        ticket_id: String,
        status: String,
        issue: String,
        priority: String,
    },

    /// A customer was notified
    NotificationSent {
        notification_id: String,
        user_id: String,
        success: bool,
    },

    /// Anything else a caller wants to remember
    Note {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
        #[serde(default)]
        metadata: HashMap<String, serde_json::Value>,
    },
}

impl Interaction {
    /// One-line summary used by context compaction
    pub fn summary(&self) -> Option<String> {
        match self {
            Interaction::Query { .. } => None,
            Interaction::Response { message, .. } => Some(message.content.clone()),
            Interaction::TicketCreated {
                ticket_id, status, ..
            } => Some(format!("ticket {} {}", ticket_id, status)),
            Interaction::NotificationSent { user_id, .. } => Some(format!("notified {}", user_id)),
            Interaction::Note { summary, .. } => summary.clone(),
        }
    }
}

/// Interaction stamped with the time the memory bank accepted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(flatten)]
    pub interaction: Interaction,

    pub timestamp: DateTime<Utc>,
}
