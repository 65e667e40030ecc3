//! Daily usage ledger.
//!
//! Counts AI requests and inbound chat messages against fixed daily
//! ceilings. The document is keyed by UTC date: the first access on a new
//! day replaces it with zeroed counters, which is the only reset mechanism.
//!
//! `can_*` / `record_*` mirror a check-then-increment calling pattern.
//! Call sites that must not race with the other process use the atomic
//! `try_acquire_*` variants, which check and increment under one lock.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use nudge_persistence::JsonDocument;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::Result;

/// Daily ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    /// AI provider calls per day across the deployment.
    pub ai_requests: u32,
    /// Inbound chat messages per user per day.
    pub messages_per_user: u32,
    /// Inbound chat messages per day across all users.
    pub total_messages: u32,
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            ai_requests: 100,
            messages_per_user: 50,
            total_messages: 200,
        }
    }
}

/// On-disk ledger for one UTC day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    pub date: NaiveDate,
    #[serde(default)]
    pub ai_request_count: u32,
    #[serde(default)]
    pub total_message_count: u32,
    #[serde(default)]
    pub per_user_message_count: BTreeMap<String, u32>,
}

impl LedgerDocument {
    /// Resets the counters if the document belongs to another day.
    fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.date == today {
            return false;
        }
        *self = Self {
            date: today,
            ..Self::default()
        };
        true
    }

    fn user_count(&self, user_id: &str) -> u32 {
        self.per_user_message_count.get(user_id).copied().unwrap_or(0)
    }
}

/// Read-only snapshot for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    /// `used/ceiling` for AI requests.
    pub ai_requests: String,
    /// `used/ceiling` for all messages.
    pub total_messages: String,
    pub date: NaiveDate,
}

/// File-backed daily usage ledger.
pub struct UsageLedger {
    document: JsonDocument<LedgerDocument>,
    limits: UsageLimits,
    clock: Arc<dyn Clock>,
}

impl UsageLedger {
    /// Creates a ledger stored at `path`.
    pub fn new(path: impl Into<PathBuf>, limits: UsageLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            document: JsonDocument::new(path),
            limits,
            clock,
        }
    }

    /// Configured ceilings.
    pub fn limits(&self) -> UsageLimits {
        self.limits
    }

    /// Runs `f` on today's document, rolling it over first if needed.
    fn with_today<R>(&self, f: impl FnOnce(&mut LedgerDocument) -> R) -> Result<R> {
        let today = self.clock.today();
        let result = self.document.update(|doc| {
            let previous = doc.date;
            if doc.roll_over(today) {
                info!(%previous, %today, "usage ledger rolled over");
            }
            f(doc)
        })?;
        Ok(result)
    }

    /// True while today's AI request count is below the ceiling.
    pub fn can_make_ai_request(&self) -> Result<bool> {
        let limit = self.limits.ai_requests;
        let used = self.with_today(|doc| doc.ai_request_count)?;
        if used >= limit {
            warn!(used, limit, "daily AI request limit reached");
            return Ok(false);
        }
        Ok(true)
    }

    /// Counts one AI request and returns today's new total.
    pub fn record_ai_request(&self) -> Result<u32> {
        let used = self.with_today(|doc| {
            doc.ai_request_count += 1;
            doc.ai_request_count
        })?;
        info!(used, limit = self.limits.ai_requests, "AI request recorded");
        Ok(used)
    }

    /// Checks the AI ceiling and counts the request in one locked step.
    pub fn try_acquire_ai_request(&self) -> Result<bool> {
        let limit = self.limits.ai_requests;
        let acquired = self.with_today(|doc| {
            if doc.ai_request_count >= limit {
                return None;
            }
            doc.ai_request_count += 1;
            Some(doc.ai_request_count)
        })?;
        match acquired {
            Some(used) => {
                info!(used, limit, "AI request recorded");
                Ok(true)
            }
            None => {
                warn!(limit, "daily AI request limit reached");
                Ok(false)
            }
        }
    }

    fn message_allowed(&self, doc: &LedgerDocument, user_id: &str) -> bool {
        if doc.total_message_count >= self.limits.total_messages {
            warn!(
                used = doc.total_message_count,
                limit = self.limits.total_messages,
                "daily total message limit reached"
            );
            return false;
        }
        let user_count = doc.user_count(user_id);
        if user_count >= self.limits.messages_per_user {
            warn!(
                user_id,
                used = user_count,
                limit = self.limits.messages_per_user,
                "user reached daily message limit"
            );
            return false;
        }
        true
    }

    /// True while both the global and the per-user message counts are below
    /// their ceilings.
    pub fn can_send_message(&self, user_id: &str) -> Result<bool> {
        self.with_today(|doc| self.message_allowed(doc, user_id))
    }

    /// Counts one message for `user_id` and globally.
    pub fn record_message(&self, user_id: &str) -> Result<()> {
        let (user, total) = self.with_today(|doc| {
            doc.total_message_count += 1;
            let user = doc
                .per_user_message_count
                .entry(user_id.to_string())
                .or_insert(0);
            *user += 1;
            (*user, doc.total_message_count)
        })?;
        info!(
            user_id,
            user,
            total,
            user_limit = self.limits.messages_per_user,
            total_limit = self.limits.total_messages,
            "message recorded"
        );
        Ok(())
    }

    /// Checks both message ceilings and counts the message in one locked step.
    pub fn try_acquire_message(&self, user_id: &str) -> Result<bool> {
        self.with_today(|doc| {
            if !self.message_allowed(doc, user_id) {
                return false;
            }
            doc.total_message_count += 1;
            *doc.per_user_message_count
                .entry(user_id.to_string())
                .or_insert(0) += 1;
            true
        })
    }

    /// Today's usage against the ceilings.
    pub fn status(&self) -> Result<UsageStatus> {
        let limits = self.limits;
        self.with_today(|doc| UsageStatus {
            ai_requests: format!("{}/{}", doc.ai_request_count, limits.ai_requests),
            total_messages: format!("{}/{}", doc.total_message_count, limits.total_messages),
            date: doc.date,
        })
    }

    /// Today's full document.
    pub fn snapshot(&self) -> Result<LedgerDocument> {
        self.with_today(|doc| doc.clone())
    }
}
