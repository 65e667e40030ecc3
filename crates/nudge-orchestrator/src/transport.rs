//! The outbound chat seam.

use async_trait::async_trait;
use thiserror::Error;

/// How the transport should interpret message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFormat {
    #[default]
    Plain,
    Html,
    /// Telegram's legacy Markdown.
    Markdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub format: MessageFormat,
    pub disable_preview: bool,
}

impl SendOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn html() -> Self {
        Self {
            format: MessageFormat::Html,
            disable_preview: true,
        }
    }

    pub fn markdown() -> Self {
        Self {
            format: MessageFormat::Markdown,
            disable_preview: false,
        }
    }
}

/// A send that did not reach the chat.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Delivers text to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<(), TransportError>;

    async fn send_typing(&self, chat_id: i64) -> Result<(), TransportError>;
}
