//! Tool result types
//!
//! Negative outcomes ("nothing found", "delivery refused") are values,
//! never errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The capabilities a tool gateway exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Search,
    Notify,
    CreateTicket,
}

impl ToolKind {
    /// Name recorded in memory and logs
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Search => "search_knowledge_base",
            ToolKind::Notify => "send_notification",
            ToolKind::CreateTicket => "create_ticket",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knowledge base search outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Whether anything matched
    pub found: bool,

    /// Matches, best first
    pub results: Vec<String>,

    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl SearchResult {
    pub fn found(results: Vec<String>, confidence: f64) -> Self {
        Self {
            found: !results.is_empty(),
            results,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            results: Vec::new(),
            confidence: 0.0,
        }
    }

    /// Best match, if any
    pub fn top(&self) -> Option<&str> {
        if self.found {
            self.results.first().map(String::as_str)
        } else {
            None
        }
    }
}

/// Notification delivery receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub success: bool,
    pub notification_id: String,
}

/// Support ticket as returned by the ticketing system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub status: String,
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
