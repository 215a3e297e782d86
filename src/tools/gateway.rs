//! Tool gateway capability interface
//!
//! Agents see tools only through this trait. Implementations must not
//! return `Err` for ordinary negative outcomes; errors mean the call
//! itself could not complete.

use crate::errors::Result;
use crate::tools::types::{NotificationReceipt, Priority, SearchResult, Ticket};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Search the knowledge base
    async fn search(&self, query: &str) -> Result<SearchResult>;

    /// Send a notification to a user
    async fn notify(&self, user_id: &str, message: &str) -> Result<NotificationReceipt>;

    /// Open a support ticket
    async fn create_ticket(&self, issue: &str, priority: Priority) -> Result<Ticket>;
}

/// Shared handle to a gateway
pub type SharedGateway = Arc<dyn ToolGateway>;

