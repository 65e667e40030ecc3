//! Per-user chat sessions with bounded history.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use nudge_core::{Clock, DeveloperProfile, UsageLedger};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ModelConfig;
use crate::prompts::chat_system_prompt;
use crate::provider::{CompletionProvider, Turn};

/// Non-system turns kept per session.
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Non-system turns forwarded to the provider per call.
pub const CONTEXT_WINDOW: usize = 10;

/// Sessions idle longer than this are dropped.
pub const DEFAULT_IDLE_TTL_HOURS: i64 = 24;

const GENERIC_APOLOGY: &str =
    "Sorry, I'm having trouble connecting to my AI brain right now. Please try again in a moment! 🤖";

const QUOTA_REPLY: &str =
    "I've hit my daily AI limit, so I can't answer right now. I'll be back tomorrow! ⏳";

const TECH_KEYWORDS: &[(&str, &str)] = &[
    ("react", "React"),
    ("rust", "Rust"),
    ("python", "Python"),
    ("typescript", "TypeScript"),
    ("javascript", "JavaScript"),
    ("docker", "Docker"),
];

struct Session {
    system: Turn,
    history: VecDeque<Turn>,
    last_active: DateTime<Utc>,
}

impl Session {
    fn new(profile: Option<&DeveloperProfile>, now: DateTime<Utc>) -> Self {
        Self {
            system: Turn::system(chat_system_prompt(profile)),
            history: VecDeque::new(),
            last_active: now,
        }
    }

    fn push(&mut self, turn: Turn, cap: usize) {
        self.history.push_back(turn);
        while self.history.len() > cap {
            self.history.pop_front();
        }
    }

    fn window(&self) -> Vec<Turn> {
        let skip = self.history.len().saturating_sub(CONTEXT_WINDOW);
        std::iter::once(self.system.clone())
            .chain(self.history.iter().skip(skip).cloned())
            .collect()
    }
}

/// In-memory chat sessions keyed by user id.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    provider: Arc<dyn CompletionProvider>,
    config: ModelConfig,
    ledger: Arc<UsageLedger>,
    clock: Arc<dyn Clock>,
    history_cap: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: ModelConfig,
        ledger: Arc<UsageLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            provider,
            config,
            ledger,
            clock,
            history_cap: DEFAULT_HISTORY_CAP,
            idle_ttl: Duration::hours(DEFAULT_IDLE_TTL_HOURS),
        }
    }

    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(CONTEXT_WINDOW);
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Answers `message` in the context of the user's session.
    ///
    /// Always returns text: provider failures and exhausted quota map to
    /// canned replies. The user's turn stays in history either way.
    pub async fn get_chat_response(
        &self,
        user_id: &str,
        message: &str,
        profile: Option<&DeveloperProfile>,
    ) -> String {
        let window = {
            let now = self.clock.now();
            let mut sessions = self.sessions.lock().await;
            self.evict_idle(&mut sessions, now);
            let session = sessions
                .entry(user_id.to_string())
                .or_insert_with(|| Session::new(profile, now));
            session.push(Turn::user(message), self.history_cap);
            session.last_active = now;
            session.window()
        };

        match self.ledger.try_acquire_ai_request() {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id, "chat reply suppressed, AI quota exhausted");
                return QUOTA_REPLY.to_string();
            }
            Err(e) => {
                error!(user_id, error = %e, "usage ledger unavailable");
                return fallback_reply(message);
            }
        }

        debug!(user_id, turns = window.len(), "forwarding chat window");
        match self.provider.complete(&window, &self.config).await {
            Ok(reply) => {
                let mut sessions = self.sessions.lock().await;
                if let Some(session) = sessions.get_mut(user_id) {
                    session.push(Turn::assistant(reply.clone()), self.history_cap);
                }
                reply
            }
            Err(e) => {
                warn!(user_id, provider = self.provider.name(), error = %e, "chat completion failed");
                fallback_reply(message)
            }
        }
    }

    /// Drops the user's session. Idempotent.
    pub async fn clear_history(&self, user_id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(user_id).is_some();
        if removed {
            info!(user_id, "chat history cleared");
        }
        removed
    }

    /// Non-system turns currently stored for the user.
    pub async fn history(&self, user_id: &str) -> Vec<Turn> {
        self.sessions
            .lock()
            .await
            .get(user_id)
            .map(|s| s.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) {
        let ttl = self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_active <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "evicted idle chat sessions");
        }
    }
}

fn fallback_reply(message: &str) -> String {
    let lower = message.to_lowercase();
    TECH_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, name)| {
            format!(
                "I'd love to help with {}! Could you be more specific about what you're working on? (I'm having API issues right now, but I'll be back soon! 🔧)",
                name
            )
        })
        .unwrap_or_else(|| GENERIC_APOLOGY.to_string())
}
