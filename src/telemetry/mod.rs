//! Telemetry for supportcrew
//!
//! Two side channels:
//! - `init_tracing` installs the process-wide `tracing` subscriber
//! - `TelemetryCollector` keeps counters of orchestration events in memory,
//!   plus the most recent events in a bounded ring

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber with `filter` (e.g. "info", "supportcrew=debug")
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(filter)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", filter, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

/// Which orchestration protocol an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Parallel,
    Sequential,
    Notification,
}

/// Events retained by a collector; older ones are dropped
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    ProtocolStarted {
        protocol: Protocol,
        timestamp: Instant,
    },
    ProtocolFinished {
        protocol: Protocol,
        success: bool,
        duration_ms: u64,
        timestamp: Instant,
    },
    AgentCompleted {
        agent_id: String,
        success: bool,
        duration_ms: u64,
        timestamp: Instant,
    },
    StateTransition {
        from: String,
        to: String,
        timestamp: Instant,
    },
    TicketCreated {
        ticket_id: String,
        timestamp: Instant,
    },
    NotificationSent {
        notification_id: String,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryStats {
    pub parallel_requests: usize,
    pub escalations: usize,
    pub notifications_requested: usize,
    pub protocols_failed: usize,
    pub agent_queries: usize,
    pub agent_failures: usize,
    pub state_transitions: usize,
    pub tickets_created: usize,
    pub notifications_sent: usize,
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(EVENT_LOG_CAPACITY))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = self.stats.lock();
            match &event {
                TelemetryEvent::ProtocolStarted { protocol, .. } => match protocol {
                    Protocol::Parallel => stats.parallel_requests += 1,
                    Protocol::Sequential => stats.escalations += 1,
                    Protocol::Notification => stats.notifications_requested += 1,
                },
                TelemetryEvent::ProtocolFinished { success, .. } => {
                    if !*success {
                        stats.protocols_failed += 1;
                    }
                }
                TelemetryEvent::AgentCompleted { success, .. } => {
                    stats.agent_queries += 1;
                    if !*success {
                        stats.agent_failures += 1;
                    }
                }
                TelemetryEvent::StateTransition { .. } => {
                    stats.state_transitions += 1;
                }
                TelemetryEvent::TicketCreated { .. } => {
                    stats.tickets_created += 1;
                }
                TelemetryEvent::NotificationSent { .. } => {
                    stats.notifications_sent += 1;
                }
            }
        }

        let mut events = self.events.lock();
        if events.len() == EVENT_LOG_CAPACITY {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        self.stats.lock().clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Number of retained events, at most `EVENT_LOG_CAPACITY`
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = self.events.lock();
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Fraction of agent queries that succeeded
    pub fn agent_success_rate(&self) -> f64 {
        let stats = self.stats.lock();
        if stats.agent_queries == 0 {
            1.0
        } else {
            (stats.agent_queries - stats.agent_failures) as f64 / stats.agent_queries as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}
