//! One reminder run: check today's commit, pick the notification, send it
//! at most once.

use std::sync::Arc;

use nudge_agent::{IdeaGenerator, IdeaSource};
use nudge_core::{Clock, CodeHosting, NotificationLog, StatsStore, TimeBand};
use tracing::{info, warn};

use crate::error::Result;
use crate::messages;
use crate::transport::{ChatTransport, SendOptions};

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Celebrated,
    AlreadyCelebrated,
    Nudged(TimeBand),
    Reminded(IdeaSource),
    AlreadyReminded,
}

/// Summary of a run, logged by the caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub band: TimeBand,
    pub committed: bool,
    pub outcome: Outcome,
    /// The text sent, or that would have been sent in a dry run.
    pub message: Option<String>,
    pub dry_run: bool,
}

/// Collaborators for a run.
pub struct NotificationOrchestrator {
    hosting: Arc<dyn CodeHosting>,
    generator: Arc<IdeaGenerator>,
    transport: Arc<dyn ChatTransport>,
    log: NotificationLog,
    stats: StatsStore,
    clock: Arc<dyn Clock>,
    username: String,
    chat_id: i64,
    dry_run: bool,
    band_override: Option<TimeBand>,
}

impl NotificationOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hosting: Arc<dyn CodeHosting>,
        generator: Arc<IdeaGenerator>,
        transport: Arc<dyn ChatTransport>,
        log: NotificationLog,
        stats: StatsStore,
        clock: Arc<dyn Clock>,
        username: impl Into<String>,
        chat_id: i64,
    ) -> Self {
        Self {
            hosting,
            generator,
            transport,
            log,
            stats,
            clock,
            username: username.into(),
            chat_id,
            dry_run: false,
            band_override: None,
        }
    }

    /// Build messages without sending or marking anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Forces the time-of-day band instead of deriving it from the clock.
    pub fn with_band(mut self, band: Option<TimeBand>) -> Self {
        self.band_override = band;
        self
    }

    /// Executes one run.
    ///
    /// Dedup marks are written only after the transport accepted the
    /// message, so a failed send is retried by the next run.
    pub async fn run(&self) -> Result<RunReport> {
        let now = self.clock.now();
        let today = self.clock.today();
        let band = self.band_override.unwrap_or_else(|| TimeBand::at(now));

        let committed = match self.hosting.has_committed_on(&self.username, today).await {
            Ok(committed) => committed,
            Err(e) => {
                warn!(username = %self.username, error = %e, "commit check failed, assuming no commit");
                false
            }
        };
        info!(%band, %today, committed, dry_run = self.dry_run, "running commit check");

        if !self.dry_run {
            self.stats.record_tracked_day(today)?;
        }

        if committed {
            self.on_committed(band).await
        } else {
            self.on_missing(band).await
        }
    }

    async fn on_committed(&self, band: TimeBand) -> Result<RunReport> {
        let streak = if self.dry_run {
            None
        } else {
            Some(self.stats.record_commit_day(self.clock.today())?.current_streak)
        };

        if self.log.already_celebrated_today()? {
            info!("already celebrated today");
            return Ok(self.report(band, true, Outcome::AlreadyCelebrated, None));
        }

        let message = messages::celebration(band, streak);
        self.deliver(&message).await?;
        if !self.dry_run {
            self.log.mark_celebrated()?;
        }
        Ok(self.report(band, true, Outcome::Celebrated, Some(message)))
    }

    async fn on_missing(&self, band: TimeBand) -> Result<RunReport> {
        if band != TimeBand::Evening {
            let message = messages::nudge(band);
            self.deliver(&message).await?;
            return Ok(self.report(band, false, Outcome::Nudged(band), Some(message)));
        }

        if self.log.already_reminded_today()? {
            info!("already reminded today");
            return Ok(self.report(band, false, Outcome::AlreadyReminded, None));
        }

        let profile = match self.hosting.profile(&self.username).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "profile fetch failed, generating idea without it");
                None
            }
        };
        let generated = self.generator.generate_project_idea(profile.as_ref()).await;
        info!(source = %generated.source, title = %generated.idea.title, "idea selected for reminder");

        let message = messages::reminder(&generated.idea);
        self.deliver(&message).await?;
        if !self.dry_run {
            self.log.mark_reminded()?;
        }
        Ok(self.report(band, false, Outcome::Reminded(generated.source), Some(message)))
    }

    async fn deliver(&self, message: &str) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        self.transport
            .send_message(self.chat_id, message, SendOptions::html())
            .await?;
        info!(chat_id = self.chat_id, "notification sent");
        Ok(())
    }

    fn report(
        &self,
        band: TimeBand,
        committed: bool,
        outcome: Outcome,
        message: Option<String>,
    ) -> RunReport {
        RunReport {
            band,
            committed,
            outcome,
            message,
            dry_run: self.dry_run,
        }
    }
}
