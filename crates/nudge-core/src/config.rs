//! Shared configuration for commit-nudge.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.commit-nudge/
//! ├── config/
//! │   └── .env.local          # Secrets (tokens, API keys)
//! └── state/
//!     ├── usage.json          # Daily usage ledger
//!     ├── notifications.json  # Notification dedup log
//!     ├── stats.json          # Streak and suggestion counters
//!     └── user-settings.json  # Per-user timezone preference
//! ```
//!
//! # Environment Variables
//!
//! - `NUDGE_STATE_DIR`: Override the base directory
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`: Chat transport
//! - `GITHUB_USERNAME` (required), `GITHUB_TOKEN`: Account to watch
//! - `GROQ_API_KEY`, `GEMINI_API_KEY`: Primary and secondary AI providers
//! - `NUDGE_IDEAS_FILE`: Replace the bundled idea catalog
//! - `NUDGE_DEFAULT_TIMEZONE`: Display timezone for users without a preference
//! - `NUDGE_AI_REQUEST_LIMIT`, `NUDGE_MESSAGES_PER_USER_LIMIT`,
//!   `NUDGE_TOTAL_MESSAGES_LIMIT`: Daily ceilings

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::ledger::UsageLimits;
use crate::settings::parse_timezone;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "NUDGE_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".commit-nudge";

/// Timezone used when neither the user nor the deployment chose one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

const CONFIG_SUBDIR: &str = "config";
const STATE_SUBDIR: &str = "state";

/// Get the base directory.
///
/// 1. `NUDGE_STATE_DIR` if set
/// 2. `~/.commit-nudge` if a home directory is available
/// 3. `.commit-nudge` in the current directory
pub fn default_state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Loads `.env` files: `<base>/config/.env.local` first, then a local
/// `.env.local` or `.env`. Variables already set are never overridden.
pub fn load_env_files() {
    let env_path = StatePaths::new(default_state_dir()).env_file();
    if env_path.exists() {
        if let Err(e) = dotenvy::from_path(&env_path) {
            debug!(error = %e, path = %env_path.display(), "could not load env file");
        }
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}

/// Locations of the shared documents under a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    base: PathBuf,
}

impl StatePaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join(CONFIG_SUBDIR)
    }

    pub fn env_file(&self) -> PathBuf {
        self.config_dir().join(".env.local")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.base.join(STATE_SUBDIR)
    }

    pub fn usage_file(&self) -> PathBuf {
        self.documents_dir().join("usage.json")
    }

    pub fn notifications_file(&self) -> PathBuf {
        self.documents_dir().join("notifications.json")
    }

    pub fn stats_file(&self) -> PathBuf {
        self.documents_dir().join("stats.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.documents_dir().join("user-settings.json")
    }

    /// Creates the config and state directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.config_dir())?;
        std::fs::create_dir_all(self.documents_dir())
    }
}

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: StatePaths,
    pub telegram_bot_token: Option<String>,
    /// Chat that receives the scheduled notifications.
    pub notify_chat_id: Option<i64>,
    pub github_username: String,
    pub github_token: Option<String>,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ideas_file: Option<PathBuf>,
    pub default_timezone: Tz,
    pub limits: UsageLimits,
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Configuration(format!("{} has an invalid value: {}", name, raw))),
    }
}

impl AppConfig {
    /// Reads the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let github_username = env_string("GITHUB_USERNAME").ok_or_else(|| {
            CoreError::Configuration("Missing GITHUB_USERNAME environment variable".into())
        })?;

        let default_timezone = match env_string("NUDGE_DEFAULT_TIMEZONE") {
            Some(name) => parse_timezone(&name)?,
            None => parse_timezone(DEFAULT_TIMEZONE)?,
        };

        let defaults = UsageLimits::default();
        let limits = UsageLimits {
            ai_requests: env_parse("NUDGE_AI_REQUEST_LIMIT")?.unwrap_or(defaults.ai_requests),
            messages_per_user: env_parse("NUDGE_MESSAGES_PER_USER_LIMIT")?
                .unwrap_or(defaults.messages_per_user),
            total_messages: env_parse("NUDGE_TOTAL_MESSAGES_LIMIT")?
                .unwrap_or(defaults.total_messages),
        };

        Ok(Self {
            paths: StatePaths::new(default_state_dir()),
            telegram_bot_token: env_string("TELEGRAM_BOT_TOKEN"),
            notify_chat_id: env_parse("TELEGRAM_CHAT_ID")?,
            github_username,
            github_token: env_string("GITHUB_TOKEN"),
            groq_api_key: env_string("GROQ_API_KEY"),
            gemini_api_key: env_string("GEMINI_API_KEY"),
            ideas_file: env_string("NUDGE_IDEAS_FILE").map(PathBuf::from),
            default_timezone,
            limits,
        })
    }
}
