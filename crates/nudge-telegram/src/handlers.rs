//! Command and message handlers for the Telegram bot.
//!
//! Handlers talk to the chat through [`ChatTransport`] so they can run
//! against a recording transport in tests.

use nudge_core::{current_streak, CoreError};
use nudge_orchestrator::messages::{escape_html, plural_days, suggestion};
use nudge_orchestrator::{SendOptions, TransportError};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::format::{schedule_lines, split_message, MAX_MESSAGE_LEN};
use crate::state::BotState;

type HandlerResult = std::result::Result<(), TransportError>;

const TIMEZONE_LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Get started and see the reminder schedule")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Get an AI-generated project idea")]
    Suggest,

    #[command(description = "View your GitHub statistics and streak")]
    Stats,

    #[command(description = "Show or set your timezone: /timezone [Area/City]")]
    Timezone(String),

    #[command(description = "Understand how this bot works")]
    About,

    #[command(description = "Clear conversation history")]
    Clear,

    #[command(description = "Show today's AI and message usage")]
    Usage,

    #[command(description = "Show this chat's id")]
    Chatid,
}

async fn send_html(state: &BotState, chat_id: i64, text: &str) -> HandlerResult {
    state.transport.send_message(chat_id, text, SendOptions::html()).await
}

async fn send_plain(state: &BotState, chat_id: i64, text: &str) -> HandlerResult {
    state.transport.send_message(chat_id, text, SendOptions::plain()).await
}

fn today_schedule(state: &BotState, user_id: &str) -> String {
    let tz = state.timezone(user_id);
    schedule_lines(tz, state.services.clock.today())
}

/// Handle the /start command.
pub async fn handle_start(state: &BotState, chat_id: i64) -> HandlerResult {
    let user_id = chat_id.to_string();
    let welcome = format!(
        "👋 Welcome to <b>GitHub Commit Reminder Bot</b>!\n\n\
        I'll help you maintain your GitHub streak by:\n\
        ✅ Checking if you've committed today\n\
        🤖 Suggesting AI-generated project ideas\n\
        💬 Answering your coding questions\n\
        📊 Tracking your commit statistics\n\n\
        <b>Available Commands:</b>\n\
        /suggest - Get a new project idea\n\
        /stats - View your GitHub stats\n\
        /timezone - Set your timezone\n\
        /about - How this bot works\n\
        /clear - Clear chat history\n\
        /help - Show help message\n\n\
        <b>Reminder Schedule (3x daily):</b>\n\
        {}\n\n\
        You can also just chat with me naturally about coding!",
        today_schedule(state, &user_id)
    );
    send_html(state, chat_id, &welcome).await?;
    info!(chat_id, "user started bot");
    Ok(())
}

/// Handle the /help command.
pub async fn handle_help(state: &BotState, chat_id: i64) -> HandlerResult {
    let user_id = chat_id.to_string();
    let help = format!(
        "<b>GitHub Commit Reminder Bot - Help</b>\n\n\
        <b>Commands:</b>\n\
        {}\n\
        <b>How it works:</b>\n\
        • Automated checks 3 times daily:\n\
        {}\n\
        • If you haven't committed, you get a project idea\n\
        • Ideas are tailored to your GitHub profile\n\
        • Chat with me anytime about coding questions!\n\n\
        Type /about to learn more about the system. Keep coding! 💪",
        escape_html(&Command::descriptions().to_string()),
        today_schedule(state, &user_id)
    );
    send_html(state, chat_id, &help).await
}

/// Handle the /suggest command.
pub async fn handle_suggest(state: &BotState, chat_id: i64) -> HandlerResult {
    send_plain(state, chat_id, "🤖 Generating a unique project idea for you...").await?;

    let services = &state.services;
    let profile = match services.hosting.profile(&services.config.github_username).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "profile fetch failed, suggesting without it");
            None
        }
    };
    let generated = services.generator.generate_project_idea(profile.as_ref()).await;

    match services.stats.record_suggestion() {
        Ok(total) => debug!(total, "suggestion counted"),
        Err(e) => error!(error = %e, "failed to record suggestion"),
    }

    info!(chat_id, source = %generated.source, title = %generated.idea.title, "suggestion sent");
    send_html(state, chat_id, &suggestion(&generated.idea)).await
}

/// Handle the /stats command.
pub async fn handle_stats(state: &BotState, chat_id: i64) -> HandlerResult {
    send_plain(state, chat_id, "📊 Fetching your GitHub statistics...").await?;

    let services = &state.services;
    let username = services.config.github_username.as_str();
    let (activity, profile) = futures::join!(
        services.hosting.recent_activity(username),
        services.hosting.profile(username)
    );

    let profile = match profile {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "failed to fetch profile for stats");
            return send_plain(state, chat_id, "❌ Failed to fetch stats. Please try again.").await;
        }
    };
    let streak = match activity {
        Ok(events) => current_streak(&events, services.clock.today()),
        Err(e) => {
            warn!(error = %e, "failed to fetch activity, reporting zero streak");
            0
        }
    };
    let stats = services.stats.load().unwrap_or_else(|e| {
        error!(error = %e, "failed to read stats");
        Default::default()
    });

    let languages = if profile.languages.is_empty() {
        "N/A".to_string()
    } else {
        profile.languages_display()
    };
    let message = format!(
        "📊 <b>Your GitHub Statistics</b>\n\n\
        🔥 <b>Current Streak:</b> {}\n\
        🏆 <b>Longest Tracked Streak:</b> {}\n\
        📦 <b>Public Repos:</b> {}\n\
        💻 <b>Languages:</b> {}\n\
        🤖 <b>AI Suggestions Requested:</b> {}\n\n\
        <b>Recent Projects:</b>\n{}\n\n\
        Keep building! 💪",
        plural_days(streak),
        plural_days(stats.longest_streak),
        profile.public_repos,
        escape_html(&languages),
        stats.suggestions_requested,
        escape_html(&profile.recent_repos_display()),
    );
    send_html(state, chat_id, &message).await
}

/// Handle the /timezone command, with or without an argument.
pub async fn handle_timezone(state: &BotState, chat_id: i64, arg: String) -> HandlerResult {
    let user_id = chat_id.to_string();
    let name = arg.trim();

    if name.is_empty() {
        let current = state.timezone(&user_id);
        let message = format!(
            "⏰ <b>Timezone Settings</b>\n\n\
            Your current timezone: <code>{}</code>\n\n\
            To change it, use:\n\
            /timezone &lt;timezone&gt;\n\n\
            <b>Examples:</b>\n\
            /timezone America/New_York\n\
            /timezone Europe/London\n\
            /timezone Asia/Tokyo\n\
            /timezone Australia/Sydney\n\n\
            <a href=\"{}\">Full list of timezones</a>",
            current.name(),
            TIMEZONE_LIST_URL
        );
        return send_html(state, chat_id, &message).await;
    }

    match state.services.settings.set_timezone(&user_id, name) {
        Ok(tz) => {
            info!(chat_id, timezone = tz.name(), "timezone updated");
            let message = format!(
                "✅ Timezone updated to <code>{}</code>!\n\nYour reminder times:\n{}",
                tz.name(),
                schedule_lines(tz, state.services.clock.today())
            );
            send_html(state, chat_id, &message).await
        }
        Err(CoreError::InvalidTimezone(bad)) => {
            let message = format!(
                "❌ Invalid timezone: <code>{}</code>\n\n\
                Please use a valid timezone from the <a href=\"{}\">IANA database</a>.",
                escape_html(&bad),
                TIMEZONE_LIST_URL
            );
            send_html(state, chat_id, &message).await
        }
        Err(e) => {
            error!(chat_id, error = %e, "failed to save timezone");
            send_plain(state, chat_id, "❌ Could not save your timezone. Please try again.").await
        }
    }
}

/// Handle the /about command.
pub async fn handle_about(state: &BotState, chat_id: i64) -> HandlerResult {
    let about = "<b>How This Bot Works</b>\n\n\
        This system has two parts:\n\n\
        <b>1. Automated Commit Checker</b>\n\
        • Runs 3x daily on a schedule\n\
        • Checks if you've committed to GitHub\n\
        • Sends you reminders with AI project ideas if you haven't\n\n\
        <b>2. Conversational AI (Me!)</b>\n\
        • Available 24/7 for coding questions\n\
        • Helps with debugging, architecture, best practices\n\
        • Generates project ideas on demand\n\n\
        Note: I can't manually check your commits, that's handled automatically by the scheduled checker. \
        I'm here to chat and help with coding! 💬";
    send_html(state, chat_id, about).await
}

/// Handle the /clear command.
pub async fn handle_clear(state: &BotState, chat_id: i64) -> HandlerResult {
    if let Some(sessions) = &state.sessions {
        sessions.clear_history(&chat_id.to_string()).await;
    }
    send_plain(state, chat_id, "🗑️ Conversation history cleared! Starting fresh.").await
}

/// Handle the /usage command.
pub async fn handle_usage(state: &BotState, chat_id: i64) -> HandlerResult {
    match state.services.ledger.status() {
        Ok(status) => {
            let message = format!(
                "📈 <b>Usage for {}</b> (UTC)\n\n\
                🤖 AI requests: {}\n\
                💬 Messages: {}",
                status.date, status.ai_requests, status.total_messages
            );
            send_html(state, chat_id, &message).await
        }
        Err(e) => {
            error!(error = %e, "failed to read usage ledger");
            send_plain(state, chat_id, "❌ Usage data is unavailable right now.").await
        }
    }
}

/// Handle the /chatid command.
pub async fn handle_chatid(state: &BotState, chat_id: i64) -> HandlerResult {
    let message = format!(
        "🆔 This chat's id is <code>{}</code>\n\nSet <code>TELEGRAM_CHAT_ID={}</code> to receive reminders here.",
        chat_id, chat_id
    );
    send_html(state, chat_id, &message).await
}

/// Reply to a `/something` that did not parse as a [`Command`].
pub async fn handle_unknown_command(state: &BotState, chat_id: i64, text: &str) -> HandlerResult {
    let command = text.split_whitespace().next().unwrap_or(text);
    info!(chat_id, command, "unrecognized command");
    send_plain(
        state,
        chat_id,
        &format!("Unknown command: {}\n\nUse /help to see available commands.", command),
    )
    .await
}

/// Handle a plain text message: quota, typing indicator, chat reply.
pub async fn handle_message(state: &BotState, chat_id: i64, text: &str) -> HandlerResult {
    let user_id = chat_id.to_string();
    let services = &state.services;

    match services.ledger.try_acquire_message(&user_id) {
        Ok(true) => {}
        Ok(false) => {
            warn!(chat_id, "message quota exhausted");
            return send_plain(
                state,
                chat_id,
                "⏳ You've reached today's message limit. I'll be happy to chat again tomorrow!",
            )
            .await;
        }
        Err(e) => {
            error!(chat_id, error = %e, "usage ledger unavailable");
            return send_plain(state, chat_id, "❌ Sorry, I encountered an error. Please try again!").await;
        }
    }

    let Some(sessions) = &state.sessions else {
        return send_plain(
            state,
            chat_id,
            "💬 Chat is not configured. Set GROQ_API_KEY or GEMINI_API_KEY to enable it.",
        )
        .await;
    };

    if let Err(e) = state.transport.send_typing(chat_id).await {
        debug!(chat_id, error = %e, "typing indicator failed");
    }

    let profile = match services.hosting.profile(&services.config.github_username).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "profile fetch failed, chatting without it");
            None
        }
    };

    let reply = sessions.get_chat_response(&user_id, text, profile.as_ref()).await;
    send_reply(state, chat_id, &reply).await
}

/// Sends `reply` in parts, as Markdown with a plain-text retry per part.
async fn send_reply(state: &BotState, chat_id: i64, reply: &str) -> HandlerResult {
    let parts = split_message(reply, MAX_MESSAGE_LEN);
    let count = parts.len();

    for (index, part) in parts.iter().enumerate() {
        if let Err(e) = state
            .transport
            .send_message(chat_id, part, SendOptions::markdown())
            .await
        {
            debug!(chat_id, error = %e, "markdown rejected, sending as plain text");
            send_plain(state, chat_id, part).await?;
        }
        if index + 1 < count {
            tokio::time::sleep(state.part_delay).await;
        }
    }
    Ok(())
}

/// Dispatch a parsed command to its handler.
pub async fn handle_command(state: &BotState, chat_id: i64, cmd: Command) -> HandlerResult {
    match cmd {
        Command::Start => handle_start(state, chat_id).await,
        Command::Help => handle_help(state, chat_id).await,
        Command::Suggest => handle_suggest(state, chat_id).await,
        Command::Stats => handle_stats(state, chat_id).await,
        Command::Timezone(arg) => handle_timezone(state, chat_id, arg).await,
        Command::About => handle_about(state, chat_id).await,
        Command::Clear => handle_clear(state, chat_id).await,
        Command::Usage => handle_usage(state, chat_id).await,
        Command::Chatid => handle_chatid(state, chat_id).await,
    }
}
