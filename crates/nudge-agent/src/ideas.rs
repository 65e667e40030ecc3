//! Project idea fallback chain: each provider in order, then the catalog.

use std::sync::Arc;

use nudge_core::{DeveloperProfile, UsageLedger};
use tracing::{error, info, warn};

use crate::catalog::IdeaCatalog;
use crate::config::ModelConfig;
use crate::idea::{GeneratedIdea, IdeaSource, ProjectIdea};
use crate::prompts::idea_prompt;
use crate::provider::{CompletionProvider, Turn};
use crate::sanitize::{parse_idea, ParsedIdea};

/// One step of the chain.
#[derive(Clone)]
pub struct IdeaStep {
    provider: Arc<dyn CompletionProvider>,
    config: ModelConfig,
}

impl IdeaStep {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: ModelConfig) -> Self {
        Self { provider, config }
    }
}

/// Produces a project idea without ever failing.
pub struct IdeaGenerator {
    steps: Vec<IdeaStep>,
    ledger: Arc<UsageLedger>,
    catalog: IdeaCatalog,
}

impl IdeaGenerator {
    pub fn new(steps: Vec<IdeaStep>, ledger: Arc<UsageLedger>, catalog: IdeaCatalog) -> Self {
        Self {
            steps,
            ledger,
            catalog,
        }
    }

    pub fn catalog(&self) -> &IdeaCatalog {
        &self.catalog
    }

    /// Tries each provider once, in order, and falls back to a random
    /// catalog entry.
    ///
    /// Every provider attempt first acquires one AI request from the
    /// ledger; a denied or failed acquisition skips that provider.
    pub async fn generate_project_idea(&self, profile: Option<&DeveloperProfile>) -> GeneratedIdea {
        let turns = [Turn::user(idea_prompt(profile))];

        for step in &self.steps {
            let name = step.provider.name();
            match self.ledger.try_acquire_ai_request() {
                Ok(true) => {}
                Ok(false) => {
                    warn!(provider = name, "skipping idea provider, AI quota exhausted");
                    continue;
                }
                Err(e) => {
                    error!(provider = name, error = %e, "usage ledger unavailable, skipping idea provider");
                    continue;
                }
            }

            if let Some(idea) = self.attempt(step, &turns).await {
                info!(provider = name, title = %idea.title, "generated project idea");
                return GeneratedIdea {
                    idea,
                    source: IdeaSource::Provider(name.to_string()),
                };
            }
        }

        warn!("all idea providers failed, using catalog");
        GeneratedIdea {
            idea: self.catalog.pick_random(),
            source: IdeaSource::Catalog,
        }
    }

    async fn attempt(&self, step: &IdeaStep, turns: &[Turn]) -> Option<ProjectIdea> {
        let name = step.provider.name();
        let raw = match step.provider.complete(turns, &step.config).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(provider = name, error = %e, "idea provider failed");
                return None;
            }
        };
        match parse_idea(&raw) {
            ParsedIdea::Parsed(idea) => Some(idea),
            ParsedIdea::Malformed(text) => {
                warn!(provider = name, response = %text, "idea provider returned malformed JSON");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{AgentError, Result};
    use crate::idea::Difficulty;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use nudge_core::{FixedClock, UsageLimits};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    pub(crate) struct FakeProvider {
        name: String,
        reply: Option<String>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeProvider {
        pub(crate) fn ok(name: &str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                reply: Some(reply.into()),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn complete(&self, _turns: &[Turn], _config: &ModelConfig) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .ok_or_else(|| AgentError::ModelInvocation(format!("{} unreachable", self.name)))
        }
    }

    const GEMINI_IDEA: &str = "```json\n{\"title\":\"Port Scout\",\"description\":\"Find which local process holds a port.\",\"techStack\":\"Rust\",\"difficulty\":\"easy\"}\n```";

    fn ledger(dir: &TempDir, ai_requests: u32) -> Arc<UsageLedger> {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap()));
        let limits = UsageLimits {
            ai_requests,
            ..UsageLimits::default()
        };
        Arc::new(UsageLedger::new(dir.path().join("usage.json"), limits, clock))
    }

    fn generator(
        primary: Arc<FakeProvider>,
        secondary: Arc<FakeProvider>,
        ledger: Arc<UsageLedger>,
    ) -> IdeaGenerator {
        IdeaGenerator::new(
            vec![
                IdeaStep::new(primary, ModelConfig::groq_ideas()),
                IdeaStep::new(secondary, ModelConfig::gemini_ideas()),
            ],
            ledger,
            IdeaCatalog::bundled().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_fails() {
        let dir = TempDir::new().unwrap();
        let primary = FakeProvider::failing("groq");
        let secondary = FakeProvider::ok("gemini", GEMINI_IDEA);
        let ledger = ledger(&dir, 100);
        let generator = generator(primary.clone(), secondary.clone(), ledger.clone());

        let generated = generator.generate_project_idea(None).await;

        assert_eq!(generated.source, IdeaSource::Provider("gemini".into()));
        assert_eq!(generated.idea.title, "Port Scout");
        assert_eq!(generated.idea.difficulty, Difficulty::Easy);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.snapshot().unwrap().ai_request_count, 2);
    }

    #[tokio::test]
    async fn test_catalog_used_when_all_providers_fail() {
        let dir = TempDir::new().unwrap();
        let generator = generator(
            FakeProvider::failing("groq"),
            FakeProvider::failing("gemini"),
            ledger(&dir, 100),
        );

        let generated = generator.generate_project_idea(None).await;

        assert_eq!(generated.source, IdeaSource::Catalog);
        assert!(generator.catalog().contains(&generated.idea));
    }

    #[tokio::test]
    async fn test_malformed_primary_falls_through() {
        let dir = TempDir::new().unwrap();
        let generator = generator(
            FakeProvider::ok("groq", "Here's a fun idea: build a CLI!"),
            FakeProvider::ok("gemini", GEMINI_IDEA),
            ledger(&dir, 100),
        );

        let generated = generator.generate_project_idea(None).await;
        assert_eq!(generated.source, IdeaSource::Provider("gemini".into()));
    }

    #[tokio::test]
    async fn test_quota_exhausted_skips_providers() {
        let dir = TempDir::new().unwrap();
        let primary = FakeProvider::ok("groq", GEMINI_IDEA);
        let secondary = FakeProvider::ok("gemini", GEMINI_IDEA);
        let generator = generator(primary.clone(), secondary.clone(), ledger(&dir, 1));

        let first = generator.generate_project_idea(None).await;
        assert_eq!(first.source, IdeaSource::Provider("groq".into()));

        let second = generator.generate_project_idea(None).await;
        assert_eq!(second.source, IdeaSource::Catalog);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_usage_file_skips_providers() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("usage.json"), "{not json").unwrap();
        let primary = FakeProvider::ok("groq", GEMINI_IDEA);
        let secondary = FakeProvider::ok("gemini", GEMINI_IDEA);
        let generator = generator(primary.clone(), secondary.clone(), ledger(&dir, 100));

        let generated = generator.generate_project_idea(None).await;

        assert_eq!(generated.source, IdeaSource::Catalog);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }
}
