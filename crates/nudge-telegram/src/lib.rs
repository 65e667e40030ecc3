//! Telegram interface for commit-nudge.
//!
//! Two binaries share this crate:
//!
//! - `nudge-bot`: long-polling bot answering commands and coding questions
//! - `nudge-check`: one reminder run, fired by an external scheduler at
//!   04:30, 09:30 and 14:30 UTC
//!
//! Both read and write the same documents under the state directory.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `GITHUB_USERNAME`: Account whose commits are checked
//!
//! Optional:
//! - `TELEGRAM_CHAT_ID`: Chat receiving reminders (required by `nudge-check`)
//! - `GITHUB_TOKEN`: Raises GitHub rate limits
//! - `GROQ_API_KEY`, `GEMINI_API_KEY`: AI providers
//! - `NUDGE_STATE_DIR`: State directory (default: ~/.commit-nudge)
//!
//! # Commands
//!
//! - `/start`, `/help` - Welcome text and schedule in the user's timezone
//! - `/suggest` - Generate a project idea
//! - `/stats` - Streak, repos and languages
//! - `/timezone [Area/City]` - Show or set the timezone
//! - `/about`, `/clear`, `/usage`, `/chatid`

pub mod bot;
pub mod error;
pub mod format;
pub mod handlers;
pub mod logging;
pub mod services;
pub mod state;
pub mod transport;

pub use bot::TelegramBot;
pub use error::{Result, TelegramError};
pub use handlers::Command;
pub use logging::init_tracing;
pub use services::Services;
pub use state::{create_shared_state, BotState};
pub use transport::TelegramTransport;
