//! Memory module
//!
//! The shared interaction log agents write to and metrics read from.

pub mod bank;

pub use bank::{ContextSummary, MemoryBank, DEFAULT_RETRIEVAL_LIMIT};
