//! Error types for the orchestrator.

use thiserror::Error;

use crate::transport::TransportError;

/// Orchestrator-specific errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Ledger, log or stats storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] nudge_core::CoreError),

    /// The notification could not be delivered.
    #[error("Delivery failed: {0}")]
    Delivery(#[from] TransportError),
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
