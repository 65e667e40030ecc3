//! Error types for the agent crate.

use thiserror::Error;

/// Errors that can occur talking to completion providers.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Model invocation failed (network, non-success status).
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Provider answered but the body was not usable.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// The idea catalog could not be loaded.
    #[error("idea catalog error: {0}")]
    Catalog(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
