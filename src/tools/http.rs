//! HTTP tool gateway
//!
//! Talks to a JSON tool service:
//! - `POST {base}/search`        `{query}`            -> `SearchResult`
//! - `POST {base}/notifications` `{user_id, message}` -> `NotificationReceipt`
//! - `POST {base}/tickets`       `{issue, priority}`  -> `Ticket`
//!
//! Transport errors and 5xx statuses become `ToolFailure`/`Timeout`; 4xx
//! statuses and undecodable bodies become `ToolRejected`. Only `search` is
//! retried by the configured `RetryPolicy`; notifications and tickets are
//! posted once so the service never sees a duplicate.

use crate::errors::{AgentError, Result};
use crate::tools::gateway::ToolGateway;
use crate::tools::retry::RetryPolicy;
use crate::tools::types::{NotificationReceipt, Priority, SearchResult, Ticket, ToolKind};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub struct HttpToolGateway {
    client: reqwest::Client,
    base_url: reqwest::Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpToolGateway {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let mut base_url = reqwest::Url::parse(base_url)
            .map_err(|e| AgentError::ConfigError(format!("invalid tool base_url '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            timeout,
            retry,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        self.base_url
            .join(path)
            .map_err(|e| AgentError::ConfigError(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn classify(&self, tool: ToolKind, err: reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout {
                tool: tool.name().to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            AgentError::ToolRejected {
                tool: tool.name().to_string(),
                reason: format!("malformed response: {}", err),
            }
        } else {
            AgentError::tool_failure(tool.name(), err.to_string())
        }
    }

    async fn post_once<B, R>(&self, tool: ToolKind, url: &reqwest::Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(tool, e))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AgentError::tool_failure(
                tool.name(),
                format!("tool service returned HTTP {}", status),
            ));
        }
        if !status.is_success() {
            return Err(AgentError::ToolRejected {
                tool: tool.name().to_string(),
                reason: format!("tool service returned HTTP {}", status),
            });
        }

        response.json::<R>().await.map_err(|e| self.classify(tool, e))
    }

    /// Post once; for calls with side effects
    async fn post<B, R>(&self, tool: ToolKind, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(tool = tool.name(), %url, "Calling tool service");
        self.post_once(tool, &url, body).await
    }

    /// Post under the retry policy; idempotent calls only
    async fn post_with_retry<B, R>(&self, tool: ToolKind, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(tool = tool.name(), %url, "Calling tool service");
        self.retry
            .execute(tool.name(), || self.post_once(tool, &url, body))
            .await
    }
}

#[async_trait]
impl ToolGateway for HttpToolGateway {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        let mut result: SearchResult = self
            .post_with_retry(ToolKind::Search, "search", &json!({ "query": query }))
            .await?;
        result.confidence = result.confidence.clamp(0.0, 1.0);
        Ok(result)
    }

    async fn notify(&self, user_id: &str, message: &str) -> Result<NotificationReceipt> {
        self.post(
            ToolKind::Notify,
            "notifications",
            &json!({ "user_id": user_id, "message": message }),
        )
        .await
    }

    async fn create_ticket(&self, issue: &str, priority: Priority) -> Result<Ticket> {
        self.post(
            ToolKind::CreateTicket,
            "tickets",
            &json!({ "issue": issue, "priority": priority }),
        )
        .await
    }
}
