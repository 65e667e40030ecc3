//! Model configuration for completion providers.

use serde::{Deserialize, Serialize};

/// Model parameters for one call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "llama-3.3-70b-versatile").
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for response generation (0.0 to 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Groq Llama settings used for project ideas.
    pub fn groq_ideas() -> Self {
        Self::new("llama-3.3-70b-versatile")
            .with_temperature(0.8)
            .with_max_tokens(500)
    }

    /// Gemini Flash settings used for project ideas.
    pub fn gemini_ideas() -> Self {
        Self::new("gemini-2.0-flash")
            .with_temperature(0.8)
            .with_max_tokens(500)
    }

    /// Groq Llama settings used for the conversational assistant.
    pub fn groq_chat() -> Self {
        Self::new("llama-3.3-70b-versatile")
            .with_temperature(0.7)
            .with_max_tokens(1000)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let ideas = ModelConfig::groq_ideas();
        assert_eq!(ideas.model, "llama-3.3-70b-versatile");
        assert_eq!(ideas.max_tokens, 500);
        assert_eq!(ideas.temperature, 0.8);

        let chat = ModelConfig::groq_chat();
        assert_eq!(chat.max_tokens, 1000);
        assert_eq!(ModelConfig::gemini_ideas().provider);
    }

    #[test]
    fn test_temperature_clamping() {
        let config = ModelConfig::groq_chat().with_temperature(5.0);
        assert_eq!(config.temperature, 2.0);
    }
}
