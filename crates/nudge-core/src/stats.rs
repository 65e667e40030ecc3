//! Long-running counters shown by the `/stats` command.

use std::path::PathBuf;

use chrono::NaiveDate;
use nudge_persistence::JsonDocument;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// On-disk stats document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_days_tracked: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_commit_date: Option<NaiveDate>,
    /// Days on which a commit was observed.
    pub total_commits: u32,
    pub suggestions_requested: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tracked_date: Option<NaiveDate>,
}

impl Stats {
    fn apply_commit_day(&mut self, date: NaiveDate) {
        if self.last_commit_date.is_some_and(|last| last >= date) {
            return;
        }
        let consecutive = self
            .last_commit_date
            .and_then(|last| last.succ_opt())
            .is_some_and(|next| next == date);
        self.current_streak = if consecutive { self.current_streak + 1 } else { 1 };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.total_commits += 1;
        self.last_commit_date = Some(date);
    }

    fn apply_tracked_day(&mut self, date: NaiveDate) {
        if self.last_tracked_date.is_some_and(|last| last >= date) {
            return;
        }
        self.total_days_tracked += 1;
        self.last_tracked_date = Some(date);
    }
}

/// File-backed stats store.
pub struct StatsStore {
    document: JsonDocument<Stats>,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: JsonDocument::new(path),
        }
    }

    pub fn load(&self) -> Result<Stats> {
        Ok(self.document.load()?)
    }

    /// Counts an on-demand idea request and returns the new total.
    pub fn record_suggestion(&self) -> Result<u32> {
        Ok(self.document.update(|stats| {
            stats.suggestions_requested += 1;
            stats.suggestions_requested
        })?)
    }

    /// Records that a commit was observed on `date`. Repeated calls for the
    /// same day are no-ops.
    pub fn record_commit_day(&self, date: NaiveDate) -> Result<Stats> {
        Ok(self.document.update(|stats| {
            stats.apply_commit_day(date);
            stats.clone()
        })?)
    }

    /// Records that the commit check ran on `date`.
    pub fn record_tracked_day(&self, date: NaiveDate) -> Result<()> {
        Ok(self.document.update(|stats| stats.apply_tracked_day(date))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_streak_grows_on_consecutive_days_and_resets_on_gap() {
        let dir = tempdir().unwrap();
        let store = StatsStore::new(dir.path().join("stats.json"));

        store.record_commit_day(day(10)).unwrap();
        store.record_commit_day(day(11)).unwrap();
        let stats = store.record_commit_day(day(12)).unwrap();
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);

        let stats = store.record_commit_day(day(14)).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_commits, 4);
        assert_eq!(stats.last_commit_date, Some(day(14)));
    }

    #[test]
    fn test_same_day_is_counted_once() {
        let dir = tempdir().unwrap();
        let store = StatsStore::new(dir.path().join("stats.json"));

        store.record_commit_day(day(14)).unwrap();
        store.record_tracked_day(day(14)).unwrap();
        store.record_tracked_day(day(14)).unwrap();
        let stats = store.record_commit_day(day(14)).unwrap();

        assert_eq!(stats.total_commits, 1);
        assert_eq!(store.load().unwrap().total_days_tracked, 1);
    }

    #[test]
    fn test_record_suggestion_counts_up() {
        let dir = tempdir().unwrap();
        let store = StatsStore::new(dir.path().join("stats.json"));

        store.record_suggestion().unwrap();
        assert_eq!(store.record_suggestion().unwrap(), 2);
    }

    #[test]
    fn test_reads_legacy_document_without_tracking_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(
            &path,
            r#"{"totalDaysTracked":3,"currentStreak":1,"longestStreak":4,"lastCommitDate":null,"totalCommits":7,"suggestionsRequested":2}"#,
        )
        .unwrap();

        let stats = StatsStore::new(path).load().unwrap();
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.last_tracked_date, None);
    }
}
