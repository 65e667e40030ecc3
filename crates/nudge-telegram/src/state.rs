//! Shared state for the Telegram bot.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use nudge_agent::SessionStore;
use nudge_orchestrator::ChatTransport;
use tracing::{error, warn};

use crate::services::Services;

/// Pause between parts of a split reply.
pub const PART_DELAY: Duration = Duration::from_millis(500);

/// State handed to every handler.
pub struct BotState {
    pub services: Services,
    pub sessions: Option<SessionStore>,
    pub transport: Arc<dyn ChatTransport>,
    pub part_delay: Duration,
}

impl BotState {
    pub fn new(services: Services, transport: Arc<dyn ChatTransport>) -> Self {
        let sessions = match &services.chat_provider {
            Some((provider, config)) => Some(SessionStore::new(
                Arc::clone(provider),
                config.clone(),
                Arc::clone(&services.ledger),
                Arc::clone(&services.clock),
            )),
            None => {
                warn!("no AI provider configured, chat replies disabled");
                None
            }
        };
        Self {
            services,
            sessions,
            transport,
            part_delay: PART_DELAY,
        }
    }

    pub fn with_part_delay(mut self, delay: Duration) -> Self {
        self.part_delay = delay;
        self
    }

    /// The user's timezone, falling back to the deployment default when the
    /// settings document cannot be read.
    pub fn timezone(&self, user_id: &str) -> Tz {
        self.services
            .settings
            .timezone(user_id)
            .unwrap_or_else(|e| {
                error!(user_id, error = %e, "failed to read user settings");
                self.services.config.default_timezone
            })
    }
}

/// Create shared state for the bot.
pub fn create_shared_state(services: Services, transport: Arc<dyn ChatTransport>) -> Arc<BotState> {
    Arc::new(BotState::new(services, transport))
}
