//! Scheduled commit check: one orchestrator run, then exit.
//!
//! ```bash
//! nudge-check            # band from the current UTC hour
//! nudge-check --band evening --dry-run
//! ```

use std::sync::Arc;

use clap::Parser;
use nudge_core::{load_env_files, AppConfig, TimeBand};
use nudge_orchestrator::NotificationOrchestrator;
use nudge_telegram::{init_tracing, Services, TelegramError, TelegramTransport};
use teloxide::Bot;

/// Check today's commit and send the matching notification
#[derive(Parser, Debug)]
#[command(name = "nudge-check")]
struct Args {
    /// Print the message instead of sending it; nothing is recorded
    #[arg(long)]
    dry_run: bool,

    /// Force the time-of-day band (morning, afternoon, evening)
    #[arg(long)]
    band: Option<TimeBand>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    load_env_files();
    init_tracing("nudge_check", args.verbose);

    let config = AppConfig::from_env()?;
    let token = config
        .telegram_bot_token
        .clone()
        .ok_or(TelegramError::NoToken)?;
    let chat_id = config.notify_chat_id.ok_or(TelegramError::NoChatId)?;
    let username = config.github_username.clone();

    let services = Services::build(config)?;
    let transport = Arc::new(TelegramTransport::new(Bot::new(token)));
    let orchestrator = NotificationOrchestrator::new(
        Arc::clone(&services.hosting),
        Arc::clone(&services.generator),
        transport,
        services.notification_log(),
        services.stats,
        Arc::clone(&services.clock),
        username,
        chat_id,
    )
    .dry_run(args.dry_run)
    .with_band(args.band);

    let report = match orchestrator.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "commit check failed");
            return Err(TelegramError::from(e).into());
        }
    };

    tracing::info!(
        band = %report.band,
        committed = report.committed,
        outcome = ?report.outcome,
        "commit check finished"
    );

    if report.dry_run {
        match &report.message {
            Some(message) => println!("{}", message),
            None => println!("(nothing to send: {:?})", report.outcome),
        }
    }

    Ok(())
}
