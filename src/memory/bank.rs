//! Shared per-session interaction log
//!
//! Append-only storage keyed by session id:
//! - Appends are atomic across sessions (single write lock, slot created in place)
//! - Retrieval returns the most recent `limit` records, oldest first
//! - Unknown sessions read as empty, never as an error
//! - `compact_context` is the bounded summary read path

use crate::clock::{SharedClock, SystemClock};
use crate::types::{Interaction, InteractionRecord};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Records returned by `recent`
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 10;

/// Number of trailing records folded into `recent_summary`
pub const SUMMARY_WINDOW: usize = 3;

/// Separator between summaries in `recent_summary`
pub const SUMMARY_SEPARATOR: &str = " | ";

/// Compacted view of a session's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub session_id: String,
    pub interaction_count: usize,
    pub first_interaction: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    pub recent_summary: String,
}

pub struct MemoryBank {
    sessions: RwLock<HashMap<String, Vec<InteractionRecord>>>,
    clock: SharedClock,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Append an interaction to a session, creating the session if needed
    ///
    /// The timestamp is taken under the write lock so timestamps never run
    /// backwards within a session.
    pub fn store_interaction(&self, session_id: &str, interaction: Interaction) {
        let mut sessions = self.sessions.write();
        let record = InteractionRecord {
            interaction,
            timestamp: self.clock.now(),
        };
        let log = sessions.entry(session_id.to_string()).or_default();
        log.push(record);
        debug!(session_id, entries = log.len(), "Stored interaction");
    }

    /// Last `limit` records of a session in insertion order
    pub fn retrieve_session_memory(&self, session_id: &str, limit: usize) -> Vec<InteractionRecord> {
        let sessions = self.sessions.read();
        match sessions.get(session_id) {
            Some(log) => {
                let start = log.len().saturating_sub(limit);
                log[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Last `DEFAULT_RETRIEVAL_LIMIT` records of a session
    pub fn recent(&self, session_id: &str) -> Vec<InteractionRecord> {
        self.retrieve_session_memory(session_id, DEFAULT_RETRIEVAL_LIMIT)
    }

    /// Summarise a session; `None` when nothing is stored for it
    pub fn compact_context(&self, session_id: &str) -> Option<ContextSummary> {
        let sessions = self.sessions.read();
        let log = sessions.get(session_id)?;
        let first = log.first()?;
        let last = log.last()?;

        let start = log.len().saturating_sub(SUMMARY_WINDOW);
        let recent_summary = log[start..]
            .iter()
            .map(|record| record.interaction.summary().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR);

        Some(ContextSummary {
            session_id: session_id.to_string(),
            interaction_count: log.len(),
            first_interaction: first.timestamp,
            last_interaction: last.timestamp,
            recent_summary,
        })
    }

    /// Number of records stored for a session
    pub fn session_len(&self, session_id: &str) -> usize {
        self.sessions.read().get(session_id).map_or(0, Vec::len)
    }

    /// Number of sessions with at least one record
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use std::collections::HashMap as Map;

    fn note(summary: Option<&str>, n: usize) -> Interaction {
        let mut metadata = Map::new();
        metadata.insert("n".to_string(), serde_json::json!(n));
        Interaction::Note {
            summary: summary.map(str::to_string),
            metadata,
        }
    }

    fn seq(record: &InteractionRecord) -> u64 {
        match &record.interaction {
            Interaction::Note { metadata, .. } => metadata["n"].as_u64().unwrap(),
            other => panic!("unexpected interaction {:?}", other),
        }
    }

    #[test]
    fn test_store_and_retrieve_in_order() {
        let bank = MemoryBank::new();
        for i in 0..5 {
            bank.store_interaction("s1", note(None, i));
        }

        let all = bank.retrieve_session_memory("s1", 5);
        assert_eq!(all.iter().map(seq).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        let last_two = bank.retrieve_session_memory("s1", 2);
        assert_eq!(last_two.iter().map(seq).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_limit_bounds() {
        let bank = MemoryBank::new();
        bank.store_interaction("s1", note(None, 0));
        bank.store_interaction("s1", note(None, 1));

        assert!(bank.retrieve_session_memory("s1", 0).is_empty());
        assert_eq!(bank.retrieve_session_memory("s1", 50).len(), 2);
    }

    #[test]
    fn test_recent_uses_default_limit() {
        let bank = MemoryBank::new();
        for i in 0..15 {
            bank.store_interaction("s1", note(None, i));
        }
        let recent = bank.recent("s1");
        assert_eq!(recent.len(), DEFAULT_RETRIEVAL_LIMIT);
        assert_eq!(seq(&recent[0]), 5);
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let bank = MemoryBank::new();
        assert!(bank.retrieve_session_memory("nope", 10).is_empty());
        assert!(bank.compact_context("nope").is_none());
        assert_eq!(bank.session_len("nope"), 0);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let bank = MemoryBank::new();
        bank.store_interaction("a", note(None, 0));
        bank.store_interaction("b", note(None, 1));
        bank.store_interaction("b", note(None, 2));

        assert_eq!(bank.session_len("a"), 1);
        assert_eq!(bank.session_len("b"), 2);
        assert_eq!(bank.session_count(), 2);
    }

    #[test]
    fn test_compact_context() {
        let clock = Arc::new(FixedClock::epoch());
        let bank = MemoryBank::with_clock(clock.clone());

        let first_time = clock.now();
        bank.store_interaction("s1", note(Some("one"), 0));
        clock.advance(chrono::Duration::seconds(1));
        bank.store_interaction("s1", note(Some("two"), 1));
        clock.advance(chrono::Duration::seconds(1));
        bank.store_interaction("s1", note(None, 2));
        clock.advance(chrono::Duration::seconds(1));
        bank.store_interaction("s1", note(Some("four"), 3));
        let last_time = clock.now();

        let summary = bank.compact_context("s1").unwrap();
        assert_eq!(summary.session_id, "s1");
        assert_eq!(summary.interaction_count, 4);
        assert_eq!(summary.first_interaction, first_time);
        assert_eq!(summary.last_interaction, last_time);
        assert_eq!(summary.recent_summary, "two |  | four");
    }

    #[test]
    fn test_compact_context_single_entry() {
        let bank = MemoryBank::new();
        bank.store_interaction("s1", note(Some("only"), 0));
        let summary = bank.compact_context("s1").unwrap();
        assert_eq!(summary.interaction_count, 1);
        assert_eq!(summary.recent_summary, "only");
        assert_eq!(summary.first_interaction, summary.last_interaction);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let bank = Arc::new(MemoryBank::new());
        let mut handles = Vec::new();

        for writer in 0..8u64 {
            let bank = bank.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100u64 {
                    bank.store_interaction("shared", note(None, (writer * 1000 + i) as usize));
                    bank.store_interaction(&format!("own-{}", writer), note(None, i as usize));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(bank.session_len("shared"), 800);
        assert_eq!(bank.session_count(), 9);

        let shared = bank.retrieve_session_memory("shared", 800);
        for writer in 0..8u64 {
            let mine: Vec<u64> = shared
                .iter()
                .map(seq)
                .filter(|n| n / 1000 == writer)
                .collect();
            let expected: Vec<u64> = (0..100).map(|i| writer * 1000 + i).collect();
            assert_eq!(mine, expected);
        }
    }
}
