//! End-to-end runs against on-disk state with fake collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use nudge_agent::{
    AgentError, CompletionProvider, IdeaCatalog, IdeaGenerator, IdeaSource, IdeaStep,
    ModelConfig, Turn,
};
use nudge_core::{
    Clock, CodeHosting, CoreError, DeveloperProfile, FixedClock, NotificationLog, PushEvent,
    StatsStore, TimeBand, UsageLedger, UsageLimits,
};
use nudge_orchestrator::{
    ChatTransport, MessageFormat, NotificationOrchestrator, OrchestratorError, Outcome,
    SendOptions, TransportError,
};
use tempfile::TempDir;

struct FakeHosting {
    committed: bool,
    reachable: bool,
}

#[async_trait]
impl CodeHosting for FakeHosting {
    async fn profile(&self, _username: &str) -> nudge_core::Result<DeveloperProfile> {
        Err(CoreError::Http("offline".into()))
    }

    async fn recent_activity(&self, _username: &str) -> nudge_core::Result<Vec<PushEvent>> {
        Ok(Vec::new())
    }

    async fn has_committed_on(&self, _username: &str, _date: NaiveDate) -> nudge_core::Result<bool> {
        if self.reachable {
            Ok(self.committed)
        } else {
            Err(CoreError::Api {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, SendOptions)>>,
    fail: AtomicBool,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        _chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::new("telegram unreachable"));
        }
        self.sent.lock().unwrap().push((text.to_string(), options));
        Ok(())
    }

    async fn send_typing(&self, _chat_id: i64) -> Result<(), TransportError> {
        Ok(())
    }
}

struct DownProvider(&'static str);

#[async_trait]
impl CompletionProvider for DownProvider {
    fn name(&self) -> &str {
        self.0
    }

    async fn complete(&self, _turns: &[Turn], _config: &ModelConfig) -> nudge_agent::Result<String> {
        Err(AgentError::ModelInvocation(format!("{} unreachable", self.0)))
    }
}

struct Harness {
    dir: TempDir,
    clock: Arc<FixedClock>,
    transport: Arc<RecordingTransport>,
    catalog: IdeaCatalog,
}

impl Harness {
    fn at(hour: u32) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            clock: Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 5, 14, hour, 30, 0).unwrap(),
            )),
            transport: Arc::new(RecordingTransport::default()),
            catalog: IdeaCatalog::bundled().unwrap(),
        }
    }

    fn log(&self) -> NotificationLog {
        NotificationLog::new(self.dir.path().join("notifications.json"), self.clock.clone())
    }

    fn stats(&self) -> StatsStore {
        StatsStore::new(self.dir.path().join("stats.json"))
    }

    fn orchestrator(&self, committed: bool) -> NotificationOrchestrator {
        self.orchestrator_with(FakeHosting {
            committed,
            reachable: true,
        })
    }

    fn orchestrator_with(&self, hosting: FakeHosting) -> NotificationOrchestrator {
        let ledger = Arc::new(UsageLedger::new(
            self.dir.path().join("usage.json"),
            UsageLimits::default(),
            self.clock.clone(),
        ));
        let generator = IdeaGenerator::new(
            vec![
                IdeaStep::new(Arc::new(DownProvider("groq")), ModelConfig::groq_ideas()),
                IdeaStep::new(Arc::new(DownProvider("gemini")), ModelConfig::gemini_ideas()),
            ],
            ledger,
            self.catalog.clone(),
        );
        NotificationOrchestrator::new(
            Arc::new(hosting),
            Arc::new(generator),
            self.transport.clone(),
            self.log(),
            self.stats(),
            self.clock.clone(),
            "octocat",
            1001,
        )
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[tokio::test]
async fn test_afternoon_commit_is_celebrated_once() {
    let h = Harness::at(10);

    let report = h.orchestrator(true).run().await.unwrap();

    assert_eq!(report.band, TimeBand::Afternoon);
    assert_eq!(report.outcome, Outcome::Celebrated);
    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Great job! Commit detected"));
    assert_eq!(h.log().record().unwrap().last_celebration_date, Some(h.today()));

    let again = h.orchestrator(true).run().await.unwrap();
    assert_eq!(again.outcome, Outcome::AlreadyCelebrated);
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_evening_reminder_falls_back_to_catalog() {
    let h = Harness::at(15);

    let report = h.orchestrator(false).run().await.unwrap();

    assert_eq!(report.outcome, Outcome::Reminded(IdeaSource::Catalog));
    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(h
        .catalog
        .ideas()
        .iter()
        .any(|idea| sent[0].contains(&nudge_orchestrator::messages::escape_html(&idea.title))));
    assert_eq!(h.log().record().unwrap().last_reminder_date, Some(h.today()));

    let options = h.transport.sent.lock().unwrap()[0].1;
    assert_eq!(options.format, MessageFormat::Html);
}

#[tokio::test]
async fn test_two_evening_runs_send_one_reminder() {
    let h = Harness::at(14);

    h.orchestrator(false).run().await.unwrap();
    let second = h.orchestrator(false).run().await.unwrap();

    assert_eq!(second.outcome, Outcome::AlreadyReminded);
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_failed_send_is_retried_next_run() {
    let h = Harness::at(20);
    h.transport.fail.store(true, Ordering::SeqCst);

    let err = h.orchestrator(false).run().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Delivery(_)));
    assert_eq!(h.log().record().unwrap().last_reminder_date, None);

    h.transport.fail.store(false, Ordering::SeqCst);
    let report = h.orchestrator(false).run().await.unwrap();
    assert!(matches!(report.outcome, Outcome::Reminded(_)));
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_corrupt_notification_log_is_a_storage_error() {
    let h = Harness::at(15);
    std::fs::write(h.dir.path().join("notifications.json"), "{not json").unwrap();

    let err = h.orchestrator(false).run().await.unwrap_err();

    assert!(matches!(err, OrchestratorError::Storage(_)));
    assert!(h.transport.sent().is_empty());
}

#[tokio::test]
async fn test_morning_nudges_are_not_deduplicated() {
    let h = Harness::at(5);

    h.orchestrator(false).run().await.unwrap();
    let second = h.orchestrator(false).run().await.unwrap();

    assert_eq!(second.outcome, Outcome::Nudged(TimeBand::Morning));
    assert_eq!(h.transport.sent().len(), 2);
    assert_eq!(h.log().record().unwrap().last_reminder_date, None);
}

#[tokio::test]
async fn test_unreachable_hosting_counts_as_no_commit() {
    let h = Harness::at(9);

    let report = h
        .orchestrator_with(FakeHosting {
            committed: true,
            reachable: false,
        })
        .run()
        .await
        .unwrap();

    assert!(!report.committed);
    assert_eq!(report.outcome, Outcome::Nudged(TimeBand::Afternoon));
}

#[tokio::test]
async fn test_dry_run_sends_and_marks_nothing() {
    let h = Harness::at(16);

    let report = h.orchestrator(false).dry_run(true).run().await.unwrap();

    assert!(report.dry_run);
    assert!(report.message.unwrap().contains("Reminder: Commit Today!"));
    assert!(h.transport.sent().is_empty());
    assert_eq!(h.log().record().unwrap().last_reminder_date, None);
    assert_eq!(h.stats().load().unwrap().total_days_tracked, 0);
}

#[tokio::test]
async fn test_band_override_wins_over_clock() {
    let h = Harness::at(16);

    let report = h
        .orchestrator(false)
        .with_band(Some(TimeBand::Morning))
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, Outcome::Nudged(TimeBand::Morning));
}

#[tokio::test]
async fn test_committed_run_updates_stats() {
    let h = Harness::at(11);

    h.orchestrator(true).run().await.unwrap();

    let stats = h.stats().load().unwrap();
    assert_eq!(stats.total_days_tracked, 1);
    assert_eq!(stats.total_commits, 1);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.last_commit_date, Some(h.today()));
}
