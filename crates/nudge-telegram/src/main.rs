//! commit-nudge Telegram bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx GITHUB_USERNAME=octocat cargo run -p nudge-telegram --bin nudge-bot
//! ```

use std::sync::Arc;

use clap::Parser;
use nudge_core::{load_env_files, AppConfig};
use nudge_telegram::{create_shared_state, init_tracing, Services, TelegramBot, TelegramError, TelegramTransport};
use teloxide::Bot;

/// commit-nudge bot - chat, suggestions and stats on Telegram
#[derive(Parser, Debug)]
#[command(name = "nudge-bot")]
#[command(about = "Telegram bot for commit-nudge")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    load_env_files();
    init_tracing("nudge_bot", args.verbose);

    let config = AppConfig::from_env()?;
    let token = config
        .telegram_bot_token
        .clone()
        .ok_or(TelegramError::NoToken)?;
    tracing::info!(state_dir = %config.paths.base().display(), "Loaded configuration");

    let bot = Bot::new(token);
    let services = Services::build(config)?;
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let state = create_shared_state(services, transport);
    let telegram = TelegramBot::new(bot, state);

    match telegram.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] commit-nudge bot");
            println!("   Bot: @{}", username);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    telegram.start_polling().await?;

    Ok(())
}
