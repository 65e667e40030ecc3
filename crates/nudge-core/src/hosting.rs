//! Code-hosting queries: developer profile, recent activity, commit checks.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Summary of a developer's public footprint, fetched fresh per use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProfile {
    pub bio: String,
    /// Distinct languages across recently updated repositories, first seen first.
    pub languages: Vec<String>,
    pub public_repos: u32,
    /// Up to five most recently updated repository names.
    pub recent_repos: Vec<String>,
}

impl DeveloperProfile {
    pub fn languages_display(&self) -> String {
        self.languages.join(", ")
    }

    pub fn recent_repos_display(&self) -> String {
        self.recent_repos.join(", ")
    }

    /// Bullet block embedded in LLM prompts.
    pub fn prompt_summary(&self) -> String {
        format!(
            "- Languages: {}\n- Public Repos: {}\n- Recent Projects: {}\n- Bio: {}",
            self.languages_display(),
            self.public_repos,
            self.recent_repos_display(),
            self.bio
        )
    }
}

/// A push to any repository of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushEvent {
    pub created_at: DateTime<Utc>,
}

/// Read-only view of an account on a code-hosting service.
#[async_trait]
pub trait CodeHosting: Send + Sync {
    async fn profile(&self, username: &str) -> Result<DeveloperProfile>;

    /// Push events among the account's recent public activity.
    async fn recent_activity(&self, username: &str) -> Result<Vec<PushEvent>>;

    /// Whether any commit authored by the account has a committer date of `date`.
    async fn has_committed_on(&self, username: &str, date: NaiveDate) -> Result<bool>;
}

/// Consecutive days with a push, counted back from `today`. Zero when there
/// was no push today.
pub fn current_streak(events: &[PushEvent], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = events.iter().map(|e| e.created_at.date_naive()).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 0;
    for (offset, date) in dates.into_iter().enumerate() {
        if date != today - Duration::days(offset as i64) {
            break;
        }
        streak += 1;
    }
    streak
}
