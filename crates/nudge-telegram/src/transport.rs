//! [`ChatTransport`] over the Telegram Bot API.

use async_trait::async_trait;
use nudge_orchestrator::{ChatTransport, MessageFormat, SendOptions, TransportError};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, LinkPreviewOptions, ParseMode};
use tracing::debug;

/// Sends through a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[allow(deprecated)]
fn parse_mode(format: MessageFormat) -> Option<ParseMode> {
    match format {
        MessageFormat::Plain => None,
        MessageFormat::Html => Some(ParseMode::Html),
        MessageFormat::Markdown => Some(ParseMode::Markdown),
    }
}

fn disabled_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if let Some(mode) = parse_mode(options.format) {
            request = request.parse_mode(mode);
        }
        if options.disable_preview {
            request = request.link_preview_options(disabled_preview());
        }
        request
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        debug!(chat_id, len = text.len(), "message sent");
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), TransportError> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(())
    }
}
