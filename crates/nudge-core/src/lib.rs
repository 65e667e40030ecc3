//! Commit-nudge core: shared state and queries used by every interface.
//!
//! - **config**: State directory layout and environment configuration
//! - **clock**: Injectable time source and time-of-day bands
//! - **ledger**: Daily usage ledger (AI requests, chat messages)
//! - **notification_log**: Per-day dedup of celebrations and reminders
//! - **stats**: Streak and suggestion counters
//! - **settings**: Per-user timezone preference
//! - **hosting** / **github**: Code-hosting queries and the GitHub client

pub mod clock;
pub mod config;
pub mod error;
pub mod github;
pub mod hosting;
pub mod ledger;
pub mod notification_log;
pub mod settings;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock, TimeBand, REMINDER_SCHEDULE};
pub use config::{default_state_dir, load_env_files, AppConfig, StatePaths};
pub use error::{CoreError, Result};
pub use github::GitHubClient;
pub use hosting::{current_streak, CodeHosting, DeveloperProfile, PushEvent};
pub use ledger::{LedgerDocument, UsageLedger, UsageLimits, UsageStatus};
pub use notification_log::{NotificationLog, NotificationRecord};
pub use settings::{parse_timezone, SettingsStore};
pub use stats::{Stats, StatsStore};
