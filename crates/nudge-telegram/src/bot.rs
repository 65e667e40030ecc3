//! Long-polling dispatcher for the Telegram bot.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_command, handle_message, handle_unknown_command, Command};
use crate::state::BotState;

/// The commit reminder bot.
pub struct TelegramBot {
    bot: Bot,
    state: Arc<BotState>,
}

impl TelegramBot {
    pub fn new(bot: Bot, state: Arc<BotState>) -> Self {
        Self { bot, state }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Registers the command list and handles updates until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to register command list");
        }

        let state_for_commands = Arc::clone(&self.state);
        let state_for_unknown = Arc::clone(&self.state);
        let state_for_messages = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |msg: Message, cmd: Command| {
                        let state = Arc::clone(&state_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move {
                            handle_command(&state, msg.chat.id.0, cmd)
                                .await
                                .map_err(TelegramError::from)
                        }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(|t| t.starts_with('/')))
                    .endpoint(move |msg: Message| {
                        let state = Arc::clone(&state_for_unknown);
                        async move {
                            let text = msg.text().unwrap_or_default();
                            handle_unknown_command(&state, msg.chat.id.0, text)
                                .await
                                .map_err(TelegramError::from)
                        }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(|t| !t.starts_with('/')))
                    .endpoint(move |msg: Message| {
                        let state = Arc::clone(&state_for_messages);
                        async move {
                            let text = msg.text().unwrap_or_default();
                            handle_message(&state, msg.chat.id.0, text)
                                .await
                                .map_err(TelegramError::from)
                        }
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd.kind);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
