//! Simulated tool backend
//!
//! Answers every call after a fixed delay. Used by the binary when no
//! real backend is configured.

use crate::clock::{SharedIds, UuidGenerator};
use crate::errors::Result;
use crate::tools::gateway::ToolGateway;
use crate::tools::types::{NotificationReceipt, Priority, SearchResult, Ticket};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Per-operation delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub search: Duration,
    pub notify: Duration,
    pub create_ticket: Duration,
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            search: Duration::from_millis(500),
            notify: Duration::from_millis(300),
            create_ticket: Duration::from_millis(400),
        }
    }
}

impl SimulatedLatency {
    /// No delay at all
    pub fn none() -> Self {
        Self {
            search: Duration::ZERO,
            notify: Duration::ZERO,
            create_ticket: Duration::ZERO,
        }
    }
}

/// Tool gateway that fabricates plausible answers
pub struct SimulatedTools {
    latency: SimulatedLatency,
    ids: SharedIds,
}

impl SimulatedTools {
    pub fn new(latency: SimulatedLatency) -> Self {
        Self::with_ids(latency, Arc::new(UuidGenerator))
    }

    pub fn with_ids(latency: SimulatedLatency, ids: SharedIds) -> Self {
        Self { latency, ids }
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for SimulatedTools {
    fn default() -> Self {
        Self::new(SimulatedLatency::default())
    }
}

/// `TKT-` followed by the first eight hex digits of an id
fn ticket_id(raw: &str) -> String {
    let short: String = raw.chars().filter(|c| *c != '-').take(8).collect();
    format!("TKT-{}", short)
}

#[async_trait]
impl ToolGateway for SimulatedTools {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        info!(query, "Searching knowledge base");
        Self::pause(self.latency.search).await;
        Ok(SearchResult::found(vec![format!("Result for {}", query)], 0.85))
    }

    async fn notify(&self, user_id: &str, message: &str) -> Result<NotificationReceipt> {
        info!(user_id, message, "Sending notification");
        Self::pause(self.latency.notify).await;
        Ok(NotificationReceipt {
            success: true,
            notification_id: self.ids.next_id(),
        })
    }

    async fn create_ticket(&self, issue: &str, priority: Priority) -> Result<Ticket> {
        info!(issue, %priority, "Creating ticket");
        Self::pause(self.latency.create_ticket).await;
        Ok(Ticket {
            ticket_id: ticket_id(&self.ids.next_id()),
            status: "created".to_string(),
        })
    }
}
