//! Error types for the Telegram bot and check binary.

use thiserror::Error;

/// Errors that can occur in the Telegram layer.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Notification chat not provided.
    #[error("Notification chat not set. Set TELEGRAM_CHAT_ID (send /chatid to the bot to find it).")]
    NoChatId,

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Sending to Telegram failed.
    #[error("Send failed: {0}")]
    Send(#[from] nudge_orchestrator::TransportError),

    /// Configuration or storage error.
    #[error(transparent)]
    Core(#[from] nudge_core::CoreError),

    /// Idea catalog or provider setup error.
    #[error(transparent)]
    Agent(#[from] nudge_agent::AgentError),

    /// The reminder run failed.
    #[error(transparent)]
    Orchestrator(#[from] nudge_orchestrator::OrchestratorError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
