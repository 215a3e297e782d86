//! Agent orchestrator - main coordinator
//!
//! Owns the router, support and escalation agents plus the memory bank
//! they share, and drives them through:
//! - Parallel request handling (fan-out/fan-in, per-agent failure isolation)
//! - Sequential escalation (pipeline, fail-fast)
//! - Customer notification
//! - Session pause/resume
//! - Metrics snapshots

use crate::agent::state::{SessionState, StateEvent};
use crate::agent::worker::{Agent, AgentRole};
use crate::clock::{SharedClock, SharedIds, SystemClock, UuidGenerator};
use crate::errors::{AgentError, Result};
use crate::memory::MemoryBank;
use crate::telemetry::{Protocol, TelemetryCollector, TelemetryEvent};
use crate::tools::{NotificationReceipt, Priority, SharedGateway, SimulatedTools};
use crate::types::{AgentOutcome, CustomerResponse, EscalationResult, Interaction, SessionMetrics};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument, Span};

/// Builder for [`Orchestrator`]
#[derive(Default)]
pub struct OrchestratorBuilder {
    tools: Option<SharedGateway>,
    overrides: HashMap<AgentRole, SharedGateway>,
    clock: Option<SharedClock>,
    ids: Option<SharedIds>,
    span: Option<Span>,
    telemetry: Option<TelemetryCollector>,
}

impl OrchestratorBuilder {
    /// Gateway used by every agent and by the orchestrator itself
    pub fn tools(mut self, tools: SharedGateway) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Gateway for one agent only
    pub fn agent_tools(mut self, role: AgentRole, tools: SharedGateway) -> Self {
        self.overrides.insert(role, tools);
        self
    }

    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ids(mut self, ids: SharedIds) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Parent span for all orchestrator and agent logging
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn build(self) -> Orchestrator {
        let tools: SharedGateway = self
            .tools
            .unwrap_or_else(|| Arc::new(SimulatedTools::default()));
        let clock: SharedClock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids: SharedIds = self.ids.unwrap_or_else(|| Arc::new(UuidGenerator));

        let session_id = ids.next_id();
        let span = match &self.span {
            Some(parent) => info_span!(parent: parent, "orchestrator", session_id = %session_id),
            None => info_span!("orchestrator", session_id = %session_id),
        };

        let memory = Arc::new(MemoryBank::with_clock(clock.clone()));

        let mut overrides = self.overrides;
        let mut staff = |role: AgentRole| {
            let agent_tools = overrides.remove(&role).unwrap_or_else(|| tools.clone());
            Agent::new(
                role,
                ids.next_id(),
                memory.clone(),
                agent_tools,
                clock.clone(),
                &span,
            )
        };
        let router = staff(AgentRole::Router);
        let support = staff(AgentRole::Support);
        let escalation = staff(AgentRole::Escalation);

        span.in_scope(|| info!("Multi-agent system initialized"));

        Orchestrator {
            session_id,
            state: RwLock::new(SessionState::Active),
            memory,
            router,
            support,
            escalation,
            tools,
            clock,
            telemetry: self.telemetry.unwrap_or_default(),
            span,
        }
    }
}

/// Main orchestrator
pub struct Orchestrator {
    session_id: String,
    state: RwLock<SessionState>,
    memory: Arc<MemoryBank>,
    router: Agent,
    support: Agent,
    escalation: Agent,
    tools: SharedGateway,
    clock: SharedClock,
    telemetry: TelemetryCollector,
    span: Span,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Orchestrator with system clock, uuid session ids and the given tools
    pub fn new(tools: SharedGateway) -> Self {
        Self::builder().tools(tools).build()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn agent(&self, role: AgentRole) -> &Agent {
        match role {
            AgentRole::Router => &self.router,
            AgentRole::Support => &self.support,
            AgentRole::Escalation => &self.escalation,
        }
    }

    /// Read access to the shared memory bank
    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    /// Ask router and support concurrently
    ///
    /// Never fails as a whole: an agent error is captured in its slot and
    /// the other agent's answer is still returned. Slot order is fixed
    /// regardless of completion order.
    pub async fn process_customer_request(&self, customer_query: &str) -> CustomerResponse {
        let started = Instant::now();
        self.protocol_started(Protocol::Parallel);

        async {
            info!(query = customer_query, "Processing customer request");

            let (routing, support) = tokio::join!(
                self.ask(&self.router, customer_query),
                self.ask(&self.support, customer_query),
            );

            let response = CustomerResponse {
                session_id: self.session_id.clone(),
                routing_response: AgentOutcome::capture(self.router.id(), routing),
                support_response: AgentOutcome::capture(self.support.id(), support),
                timestamp: self.clock.now(),
            };

            if !response.is_complete_success() {
                warn!("Customer request completed with agent failures");
            }
            self.protocol_finished(Protocol::Parallel, response.is_complete_success(), started);
            response
        }
        .instrument(self.span.clone())
        .await
    }

    /// Route, support, escalate, then open a high-priority ticket
    ///
    /// Each stage sees the original issue text. The first failing stage
    /// aborts the pipeline and its error is returned unchanged; no ticket is
    /// created in that case.
    pub async fn handle_complex_escalation(&self, issue: &str) -> Result<EscalationResult> {
        let started = Instant::now();
        self.protocol_started(Protocol::Sequential);

        let result = async {
            info!(issue, "Handling escalation");

            let routing = self.ask(&self.router, issue).await?;
            let support = self.ask(&self.support, &format!("Escalated: {}", issue)).await?;
            let escalation = self
                .ask(&self.escalation, &format!("Escalation needed: {}", issue))
                .await?;

            let ticket = self.tools.create_ticket(issue, Priority::High).await?;
            info!(ticket_id = %ticket.ticket_id, "Ticket created");

            self.memory.store_interaction(
                &self.session_id,
                Interaction::TicketCreated {
                    ticket_id: ticket.ticket_id.clone(),
                    status: ticket.status.clone(),
                    issue: issue.to_string(),
                    priority: Priority::High.to_string(),
                },
            );
            self.telemetry.record(TelemetryEvent::TicketCreated {
                ticket_id: ticket.ticket_id.clone(),
                timestamp: Instant::now(),
            });

            Ok::<_, AgentError>(EscalationResult {
                routing,
                support,
                escalation,
                ticket,
            })
        }
        .instrument(self.span.clone())
        .await;

        if let Err(e) = &result {
            self.span.in_scope(|| warn!(error = %e, "Escalation aborted"));
        }
        self.protocol_finished(Protocol::Sequential, result.is_ok(), started);
        result
    }

    /// Send a notification to a customer and log it to the session
    pub async fn notify_customer(&self, user_id: &str, message: &str) -> Result<NotificationReceipt> {
        let state = self.state();
        if !state.accepts_work() {
            return Err(AgentError::SessionNotActive {
                agent_id: self.session_id.clone(),
                state: state.to_string(),
            });
        }

        let started = Instant::now();
        self.protocol_started(Protocol::Notification);

        let result = async {
            let receipt = self.tools.notify(user_id, message).await?;
            info!(
                user_id,
                notification_id = %receipt.notification_id,
                success = receipt.success,
                "Notification dispatched"
            );

            self.memory.store_interaction(
                &self.session_id,
                Interaction::NotificationSent {
                    notification_id: receipt.notification_id.clone(),
                    user_id: user_id.to_string(),
                    success: receipt.success,
                },
            );
            self.telemetry.record(TelemetryEvent::NotificationSent {
                notification_id: receipt.notification_id.clone(),
                timestamp: Instant::now(),
            });

            Ok::<_, AgentError>(receipt)
        }
        .instrument(self.span.clone())
        .await;

        self.protocol_finished(Protocol::Notification, result.is_ok(), started);
        result
    }

    /// Pause the session, then router, support and escalation in that order
    ///
    /// Callable while protocols are running: work already past an agent's
    /// state check finishes, later stages are rejected.
    pub fn pause_session(&self) {
        self.apply(StateEvent::Pause);
        for agent in self.agents() {
            agent.pause_execution();
        }
        self.span.in_scope(|| info!("Session paused"));
    }

    /// Resume the session, then router, support and escalation in that order
    pub fn resume_session(&self) {
        self.apply(StateEvent::Resume);
        for agent in self.agents() {
            agent.resume_execution();
        }
        self.span.in_scope(|| info!("Session resumed"));
    }

    /// Snapshot of session state and the router's compacted memory
    pub fn get_session_metrics(&self) -> SessionMetrics {
        SessionMetrics {
            session_id: self.session_id.clone(),
            state: self.state(),
            memory_metrics: self.memory.compact_context(self.router.session_id()),
            timestamp: self.clock.now(),
        }
    }

    async fn ask(&self, agent: &Agent, query: &str) -> Result<String> {
        let started = Instant::now();
        let result = agent.process_query(query).await;
        self.telemetry.record(TelemetryEvent::AgentCompleted {
            agent_id: agent.id().to_string(),
            success: result.is_ok(),
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Instant::now(),
        });
        result
    }

    fn agents(&self) -> [&Agent; 3] {
        [&self.router, &self.support, &self.escalation]
    }

    fn apply(&self, event: StateEvent) {
        let (from, to) = {
            let mut state = self.state.write();
            let from = *state;
            *state = from.transition(event);
            (from, *state)
        };
        self.telemetry.record(TelemetryEvent::StateTransition {
            from: from.to_string(),
            to: to.to_string(),
            timestamp: Instant::now(),
        });
    }

    fn protocol_started(&self, protocol: Protocol) {
        self.telemetry.record(TelemetryEvent::ProtocolStarted {
            protocol,
            timestamp: Instant::now(),
        });
    }

    fn protocol_finished(&self, protocol: Protocol, success: bool, started: Instant) {
        self.telemetry.record(TelemetryEvent::ProtocolFinished {
            protocol,
            success,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Instant::now(),
        });
    }
}
