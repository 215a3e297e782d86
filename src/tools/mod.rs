//! Tool gateway
//!
//! Knowledge search, notifications and ticketing behind one async
//! capability trait, with three backends:
//! - `SimulatedTools` (fixed latency, fabricated answers)
//! - `HttpToolGateway` (JSON over HTTP, retried)
//! - `StubTools` (scripted, for tests)

pub mod types;
pub mod gateway;
pub mod retry;
pub mod simulated;
pub mod http;
pub mod stub;

// Re-export commonly used types
pub use types::{NotificationReceipt, Priority, SearchResult, Ticket, ToolKind};
pub use gateway::{SharedGateway, ToolGateway};
pub use retry::RetryPolicy;
pub use simulated::{SimulatedLatency, SimulatedTools};
pub use http::HttpToolGateway;
pub use stub::{RecordedCall, StubTools};
