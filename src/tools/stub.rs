//! Scripted tool gateway for tests
//!
//! Returns canned answers, can be told to fail, and records every call.

use crate::errors::{AgentError, Result};
use crate::tools::gateway::ToolGateway;
use crate::tools::types::{NotificationReceipt, Priority, SearchResult, Ticket, ToolKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

/// A call observed by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub tool: ToolKind,
    pub input: String,
}

/// Tool gateway with scripted behaviour
pub struct StubTools {
    search: SearchResult,
    ticket: Ticket,
    receipt: NotificationReceipt,
    failing: HashSet<ToolKind>,
    failing_prefixes: Vec<String>,
    search_delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTools {
    pub fn new() -> Self {
        Self {
            search: SearchResult::found(vec!["KB#1".to_string()], 0.85),
            ticket: Ticket {
                ticket_id: "TKT-stub".to_string(),
                status: "created".to_string(),
            },
            receipt: NotificationReceipt {
                success: true,
                notification_id: "notif-stub".to_string(),
            },
            failing: HashSet::new(),
            failing_prefixes: Vec::new(),
            search_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, result: SearchResult) -> Self {
        self.search = result;
        self
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = ticket;
        self
    }

    pub fn with_receipt(mut self, receipt: NotificationReceipt) -> Self {
        self.receipt = receipt;
        self
    }

    /// Every call of this kind fails
    pub fn failing(mut self, tool: ToolKind) -> Self {
        self.failing.insert(tool);
        self
    }

    /// Searches whose query starts with `prefix` fail
    pub fn failing_search_on(mut self, prefix: impl Into<String>) -> Self {
        self.failing_prefixes.push(prefix.into());
        self
    }

    /// Delay before answering a search
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, tool: ToolKind) -> usize {
        self.calls.lock().iter().filter(|c| c.tool == tool).count()
    }

    fn record(&self, tool: ToolKind, input: &str) -> Result<()> {
        self.calls.lock().push(RecordedCall {
            tool,
            input: input.to_string(),
        });

        if self.failing.contains(&tool) {
            return Err(AgentError::tool_failure(tool.name(), "stubbed failure"));
        }
        Ok(())
    }
}

impl Default for StubTools {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolGateway for StubTools {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        self.record(ToolKind::Search, query)?;
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }
        if self.failing_prefixes.iter().any(|p| query.starts_with(p.as_str())) {
            return Err(AgentError::tool_failure(
                ToolKind::Search.name(),
                format!("stubbed failure for '{}'", query),
            ));
        }
        Ok(self.search.clone())
    }

    async fn notify(&self, user_id: &str, message: &str) -> Result<NotificationReceipt> {
        self.record(ToolKind::Notify, &format!("{}: {}", user_id, message))?;
        Ok(self.receipt.clone())
    }

    async fn create_ticket(&self, issue: &str, priority: Priority) -> Result<Ticket> {
        self.record(ToolKind::CreateTicket, &format!("{} ({})", issue, priority))?;
        Ok(self.ticket.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let stub = StubTools::new();
        let result = stub.search("anything").await.unwrap();
        assert_eq!(result.top(), Some("KB#1"));
        assert_eq!(stub.call_count(ToolKind::Search), 1);
    }

    #[tokio::test]
    async fn test_failing_kind_still_recorded() {
        let stub = StubTools::new().failing(ToolKind::CreateTicket);
        assert!(stub.create_ticket("x", Priority::High).await.is_err());
        assert_eq!(stub.call_count(ToolKind::CreateTicket), 1);
        assert_eq!(stub.calls()[0].input, "x (high)");
    }

    #[test]
    fn test_receipt_override() {
        let stub = StubTools::new().with_receipt(NotificationReceipt {
            success: false,
            notification_id: "n-9".to_string(),
        });
        let receipt = tokio_test::block_on(stub.notify("user-1", "hello")).unwrap();
        assert!(!receipt.success);
        assert_eq!(stub.calls()[0].input, "user-1: hello");
    }

    #[tokio::test]
    async fn test_failing_prefix() {
        let stub = StubTools::new().failing_search_on("Escalated:");
        assert!(stub.search("Service down").await.is_ok());
        assert!(stub.search("Escalated: Service down").await.is_err());
    }
}
