//! Support agent
//!
//! A named worker bound to one role. Each query is one knowledge search,
//! logged to the shared memory bank before and after the tool call.

use crate::agent::state::{SessionState, StateEvent};
use crate::clock::SharedClock;
use crate::errors::{AgentError, Result};
use crate::memory::MemoryBank;
use crate::tools::{SearchResult, SharedGateway, ToolKind};
use crate::types::{AgentMessage, Interaction, MessageKind};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, Instrument, Span};

/// The fixed roles an orchestrator staffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Router,
    Support,
    Escalation,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Router, AgentRole::Support, AgentRole::Escalation];

    /// Stable agent identifier for this role
    pub fn agent_id(&self) -> &'static str {
        match self {
            AgentRole::Router => "router-001",
            AgentRole::Support => "support-001",
            AgentRole::Escalation => "escalate-001",
        }
    }

    /// Role name shown in responses
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Router => "Issue Router",
            AgentRole::Support => "Technical Support",
            AgentRole::Escalation => "Escalation Handler",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub struct Agent {
    id: String,
    role: AgentRole,
    session_id: String,
    state: RwLock<SessionState>,
    memory: Arc<MemoryBank>,
    tools: SharedGateway,
    clock: SharedClock,
    span: Span,
}

impl Agent {
    /// Create an agent; its spans nest under `parent`
    pub fn new(
        role: AgentRole,
        session_id: String,
        memory: Arc<MemoryBank>,
        tools: SharedGateway,
        clock: SharedClock,
        parent: &Span,
    ) -> Self {
        let id = role.agent_id().to_string();
        let span = info_span!(
            parent: parent,
            "agent",
            agent_id = %id,
            role = role.display_name(),
            session_id = %session_id
        );
        span.in_scope(|| info!("Agent initialized"));

        Self {
            id,
            role,
            session_id,
            state: RwLock::new(SessionState::Active),
            memory,
            tools,
            clock,
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Answer a query with one knowledge search
    ///
    /// Writes a query record, awaits the search, then writes a response
    /// record. A failed search leaves only the query record behind. The
    /// state is checked once on entry; pausing does not cancel a query
    /// that is already running.
    pub async fn process_query(&self, query: &str) -> Result<String> {
        let state = self.state();
        if !state.accepts_work() {
            return Err(AgentError::SessionNotActive {
                agent_id: self.id.clone(),
                state: state.to_string(),
            });
        }

        async {
            info!(query, "Processing query");

            let asked = AgentMessage::new(&self.id, query, MessageKind::Query, self.clock.now());
            self.memory.store_interaction(
                &self.session_id,
                Interaction::Query {
                    message: asked,
                    role: self.role.display_name().to_string(),
                },
            );

            let result = self.tools.search(query).await?;
            let response = self.compose_response(&result);

            let answered = AgentMessage::new(&self.id, &response, MessageKind::Response, self.clock.now())
                .with_metadata("confidence", serde_json::json!(result.confidence))
                .with_metadata("found", serde_json::json!(result.found));
            self.memory.store_interaction(
                &self.session_id,
                Interaction::Response {
                    message: answered,
                    tool_used: ToolKind::Search.name().to_string(),
                },
            );

            Ok::<_, AgentError>(response)
        }
        .instrument(self.span.clone())
        .await
    }

    fn compose_response(&self, result: &SearchResult) -> String {
        match result.top() {
            Some(top) => format!("[{}] Found response: {}", self.role, top),
            None => format!("[{}] No matching response found", self.role),
        }
    }

    /// Stop accepting work
    pub fn pause_execution(&self) {
        self.apply(StateEvent::Pause);
        self.span.in_scope(|| info!("Agent paused"));
    }

    /// Accept work again
    pub fn resume_execution(&self) {
        self.apply(StateEvent::Resume);
        self.span.in_scope(|| info!("Agent resumed"));
    }

    fn apply(&self, event: StateEvent) {
        let mut state = self.state.write();
        *state = state.transition(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::tools::StubTools;
    use std::time::Duration;

    fn agent_with(role: AgentRole, tools: StubTools) -> (Agent, Arc<MemoryBank>) {
        let memory = Arc::new(MemoryBank::new());
        let agent = Agent::new(
            role,
            "agent-session".to_string(),
            memory.clone(),
            Arc::new(tools),
            Arc::new(SystemClock),
            &Span::none(),
        );
        (agent, memory)
    }

    #[test]
    fn test_role_identity() {
        assert_eq!(AgentRole::Router.agent_id(), "router-001");
        assert_eq!(AgentRole::Escalation.agent_id(), "escalate-001");
        assert_eq!(AgentRole::Support.to_string(), "Technical Support");
    }

    #[tokio::test]
    async fn test_process_query_logs_query_then_response() {
        let (agent, memory) = agent_with(AgentRole::Router, StubTools::new());

        let response = agent.process_query("billing issue").await.unwrap();
        assert_eq!(response, "[Issue Router] Found response: KB#1");

        let log = memory.retrieve_session_memory("agent-session", 10);
        assert_eq!(log.len(), 2);
        match &log[0].interaction {
            Interaction::Query { message, role } => {
                assert_eq!(message.content, "billing issue");
                assert_eq!(message.kind, MessageKind::Query);
                assert_eq!(role, "Issue Router");
            }
            other => panic!("expected query, got {:?}", other),
        }
        match &log[1].interaction {
            Interaction::Response { message, tool_used } => {
                assert_eq!(message.content, response);
                assert_eq!(tool_used, "search_knowledge_base");
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_search_is_not_an_error() {
        let (agent, _) = agent_with(
            AgentRole::Support,
            StubTools::new().with_search(SearchResult::not_found()),
        );
        let response = agent.process_query("unknown").await.unwrap();
        assert_eq!(response, "[Technical Support] No matching response found");
    }

    #[tokio::test]
    async fn test_tool_failure_propagates_and_keeps_query_record() {
        let (agent, memory) = agent_with(AgentRole::Support, StubTools::new().failing(ToolKind::Search));

        let err = agent.process_query("billing").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolFailure { .. }));
        assert_eq!(memory.session_len("agent-session"), 1);
    }

    #[tokio::test]
    async fn test_paused_agent_rejects_work() {
        let (agent, memory) = agent_with(AgentRole::Router, StubTools::new());
        agent.pause_execution();
        assert_eq!(agent.state(), SessionState::Paused);

        let err = agent.process_query("billing").await.unwrap_err();
        assert!(matches!(err, AgentError::SessionNotActive { .. }));
        assert_eq!(memory.session_len("agent-session"), 0);

        agent.resume_execution();
        assert!(agent.process_query("billing").await.is_ok());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (agent, _) = agent_with(AgentRole::Router, StubTools::new());
        agent.pause_execution();
        agent.pause_execution();
        assert_eq!(agent.state(), SessionState::Paused);
        agent.resume_execution();
        assert_eq!(agent.state(), SessionState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_while_query_in_flight() {
        let stub = Arc::new(StubTools::new().with_search_delay(Duration::from_millis(200)));
        let memory = Arc::new(MemoryBank::new());
        let agent = Arc::new(Agent::new(
            AgentRole::Support,
            "agent-session".to_string(),
            memory.clone(),
            stub.clone(),
            Arc::new(SystemClock),
            &Span::none(),
        ));

        let running = tokio::spawn({
            let agent = agent.clone();
            async move { agent.process_query("billing").await }
        });
        while stub.call_count(ToolKind::Search) == 0 {
            tokio::task::yield_now().await;
        }

        agent.pause_execution();
        assert_eq!(agent.state(), SessionState::Paused);

        assert!(running.await.unwrap().is_ok());
        assert_eq!(memory.session_len("agent-session"), 2);

        let err = agent.process_query("refund").await.unwrap_err();
        assert!(matches!(err, AgentError::SessionNotActive { .. }));
        assert_eq!(stub.call_count(ToolKind::Search), 1);
    }
}
