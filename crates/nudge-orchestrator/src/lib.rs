//! Notification orchestration for commit-nudge.
//!
//! A run checks whether the developer committed today, chooses a
//! celebration, nudge or idea-bearing reminder from the time-of-day band,
//! and records what was sent so the same notification is not repeated.

pub mod error;
pub mod messages;
pub mod orchestrator;
pub mod transport;

pub use error::{OrchestratorError, Result};
pub use orchestrator::{NotificationOrchestrator, Outcome, RunReport};
pub use transport::{ChatTransport, MessageFormat, SendOptions, TransportError};
