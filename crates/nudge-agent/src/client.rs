//! Client for OpenAI-compatible chat completion endpoints (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ModelConfig;
use crate::error::{AgentError, Result};
use crate::provider::{CompletionProvider, Turn};

/// Groq chat completions endpoint.
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Chat completions client.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    name: String,
}

impl ChatCompletionsClient {
    /// Create a Groq client with the given API key.
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::new("groq", GROQ_API_URL, api_key)
    }

    /// Create a client for any OpenAI-compatible endpoint.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| AgentError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            name: name.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, config: &ModelConfig, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: config.model.clone(),
            messages,
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        trace!("Sending chat request: {:?}", request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ModelInvocation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::ModelInvocation(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ResponseParse(format!("Failed to parse response: {}", e)))?;

        debug!(
            provider = %self.name,
            tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
            "chat response received"
        );

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, turns: &[Turn], config: &ModelConfig) -> Result<String> {
        let messages = turns.iter().map(ChatMessage::from_turn).collect();
        let response = self.chat(config, messages).await?;
        response
            .content()
            .map(str::to_string)
            .ok_or_else(|| AgentError::ResponseParse("No content in response".to_string()))
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,

    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn from_turn(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,

    pub choices: Vec<ChatChoice>,

    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, if non-empty.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub index: u32,

    pub message: ResponseMessage,

    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub role: String,

    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_client_builds() {
        let client = ChatCompletionsClient::groq("gsk-test").unwrap();
        assert_eq!(client.name, "groq");
        assert_eq!(client.endpoint, GROQ_API_URL);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![
                ChatMessage::from_turn(&Turn::system("You are helpful.")),
                ChatMessage::from_turn(&Turn::user("Hello")),
            ],
            max_tokens: Some(500),
            temperature: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert_eq!(json["max_tokens"], 500);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_response_content() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Use a trait object."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), Some("Use a trait object."));
    }

    #[test]
    fn test_blank_content_is_none() {
        let json = r#"{
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  "}, "finish_reason": "stop"}],
            "usage": null
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), None);
    }
}
