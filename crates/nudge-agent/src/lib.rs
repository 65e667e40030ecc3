//! Generative side of commit-nudge.
//!
//! This crate talks to completion providers and turns their output into
//! something the rest of the system can always use.
//!
//! # Core Types
//!
//! - [`CompletionProvider`]: The provider seam (Groq and Gemini clients implement it)
//! - [`IdeaGenerator`]: Provider fallback chain ending in the [`IdeaCatalog`]
//! - [`SessionStore`]: Per-user chat sessions with bounded history
//! - [`ProjectIdea`] / [`ParsedIdea`]: Idea value and tagged parse outcome
//!
//! # Example
//!
//! ```ignore
//! use nudge_agent::{ChatCompletionsClient, IdeaCatalog, IdeaGenerator, IdeaStep, ModelConfig};
//!
//! let groq = Arc::new(ChatCompletionsClient::groq(key)?);
//! let generator = IdeaGenerator::new(
//!     vec![IdeaStep::new(groq, ModelConfig::groq_ideas())],
//!     ledger,
//!     IdeaCatalog::bundled()?,
//! );
//! let generated = generator.generate_project_idea(None).await;
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod gemini;
pub mod idea;
pub mod ideas;
pub mod prompts;
pub mod provider;
pub mod sanitize;

pub use catalog::IdeaCatalog;
pub use client::ChatCompletionsClient;
pub use config::ModelConfig;
pub use conversation::SessionStore;
pub use error::{AgentError, Result};
pub use gemini::GeminiClient;
pub use idea::{Difficulty, GeneratedIdea, IdeaSource, ProjectIdea};
pub use ideas::{IdeaGenerator, IdeaStep};
pub use provider::{CompletionProvider, Role, Turn};
pub use sanitize::{parse_idea, strip_code_fences, ParsedIdea};
