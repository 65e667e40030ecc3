//! Per-day deduplication of celebration and evening reminder notifications.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use nudge_persistence::JsonDocument;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;

/// On-disk record of the last day each deduplicated notification went out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(default)]
    pub last_celebration_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_reminder_date: Option<NaiveDate>,
}

/// File-backed notification log.
///
/// Marks are written only after a send has been confirmed, so a failed send
/// is retried on the next trigger.
pub struct NotificationLog {
    document: JsonDocument<NotificationRecord>,
    clock: Arc<dyn Clock>,
}

impl NotificationLog {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            document: JsonDocument::new(path),
            clock,
        }
    }

    pub fn already_celebrated_today(&self) -> Result<bool> {
        let today = self.clock.today();
        Ok(self.document.load()?.last_celebration_date == Some(today))
    }

    pub fn already_reminded_today(&self) -> Result<bool> {
        let today = self.clock.today();
        Ok(self.document.load()?.last_reminder_date == Some(today))
    }

    pub fn mark_celebrated(&self) -> Result<()> {
        let today = self.clock.today();
        self.document
            .update(|record| record.last_celebration_date = Some(today))?;
        debug!(%today, "celebration marked");
        Ok(())
    }

    pub fn mark_reminded(&self) -> Result<()> {
        let today = self.clock.today();
        self.document
            .update(|record| record.last_reminder_date = Some(today))?;
        debug!(%today, "reminder marked");
        Ok(())
    }

    /// Current record.
    pub fn record(&self) -> Result<NotificationRecord> {
        Ok(self.document.load()?)
    }
}
