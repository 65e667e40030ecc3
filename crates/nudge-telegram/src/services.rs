//! Wiring shared by the bot and the check binary.

use std::sync::Arc;

use nudge_agent::{
    ChatCompletionsClient, CompletionProvider, GeminiClient, IdeaCatalog, IdeaGenerator,
    IdeaStep, ModelConfig,
};
use nudge_core::{
    AppConfig, Clock, CodeHosting, GitHubClient, NotificationLog, SettingsStore, StatsStore,
    SystemClock, UsageLedger,
};
use tracing::{info, warn};

use crate::error::Result;

/// Everything a handler or a reminder run needs, built once from config.
pub struct Services {
    pub config: AppConfig,
    pub clock: Arc<dyn Clock>,
    pub ledger: Arc<UsageLedger>,
    pub hosting: Arc<dyn CodeHosting>,
    pub generator: Arc<IdeaGenerator>,
    /// Provider for free-form chat, absent when no AI key is configured.
    pub chat_provider: Option<(Arc<dyn CompletionProvider>, ModelConfig)>,
    pub stats: StatsStore,
    pub settings: SettingsStore,
}

impl Services {
    /// Builds clients and stores from `config`, creating the state
    /// directories.
    pub fn build(config: AppConfig) -> Result<Self> {
        config.paths.ensure_dirs()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let ledger = Arc::new(UsageLedger::new(
            config.paths.usage_file(),
            config.limits,
            Arc::clone(&clock),
        ));
        let hosting: Arc<dyn CodeHosting> =
            Arc::new(GitHubClient::new(config.github_token.clone())?);
        let catalog = IdeaCatalog::load(config.ideas_file.as_deref())?;
        info!(ideas = catalog.len(), "idea catalog loaded");

        let groq: Option<Arc<dyn CompletionProvider>> = config
            .groq_api_key
            .as_ref()
            .map(|key| {
                ChatCompletionsClient::groq(key.clone())
                    .map(|client| Arc::new(client) as Arc<dyn CompletionProvider>)
            })
            .transpose()?;
        let gemini: Option<Arc<dyn CompletionProvider>> = config
            .gemini_api_key
            .as_ref()
            .map(|key| {
                GeminiClient::new(key.clone())
                    .map(|client| Arc::new(client) as Arc<dyn CompletionProvider>)
            })
            .transpose()?;

        let mut steps = Vec::new();
        match &groq {
            Some(provider) => steps.push(IdeaStep::new(Arc::clone(provider), ModelConfig::groq_ideas())),
            None => warn!("GROQ_API_KEY not set, primary idea provider disabled"),
        }
        match &gemini {
            Some(provider) => steps.push(IdeaStep::new(Arc::clone(provider), ModelConfig::gemini_ideas())),
            None => warn!("GEMINI_API_KEY not set, secondary idea provider disabled"),
        }
        let generator = Arc::new(IdeaGenerator::new(steps, Arc::clone(&ledger), catalog));

        let chat_provider = groq
            .map(|provider| (provider, ModelConfig::groq_chat()))
            .or_else(|| {
                gemini.map(|provider| {
                    let config = ModelConfig::gemini_ideas()
                        .with_temperature(0.7)
                        .with_max_tokens(1000);
                    (provider, config)
                })
            });

        let stats = StatsStore::new(config.paths.stats_file());
        let settings = SettingsStore::new(config.paths.settings_file(), config.default_timezone);

        Ok(Self {
            config,
            clock,
            ledger,
            hosting,
            generator,
            chat_provider,
            stats,
            settings,
        })
    }

    pub fn notification_log(&self) -> NotificationLog {
        NotificationLog::new(self.config.paths.notifications_file(), Arc::clone(&self.clock))
    }
}
