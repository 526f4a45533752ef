//! Completion-client seam: the one capability object with network I/O.
//!
//! The pipeline never talks to an LLM API directly; it goes through the
//! [`CompletionClient`] trait. Production code uses [`OpenAiChatClient`]
//! (any OpenAI-compatible `/chat/completions` endpoint — Groq, OpenAI,
//! vLLM, LM Studio …); tests inject a stub via
//! [`crate::config::AnalysisConfig::client`] and never touch the network.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from the completion layer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The API returned a non-success status that is not otherwise mapped.
    #[error("API error: {0}")]
    ApiError(String),

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API answered 2xx but the body was not the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP 429.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// HTTP 401.
    #[error("Invalid API key")]
    InvalidApiKey,
}

/// One chat message in an OpenAI-compatible request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Token accounting reported by the API, when available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The model's reply plus whatever usage data the API reported.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Raw model text. Untrusted — not guaranteed to be valid JSON.
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Injected completion capability.
///
/// Implementations must be cheap to share (`Arc<dyn CompletionClient>`);
/// the pipeline makes exactly one `complete` call per analysis and performs
/// no retries.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit a single user-role prompt and return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError>;

    /// Model identifier for logs and stats.
    fn model(&self) -> &str;
}

/// Client configuration for [`OpenAiChatClient`].
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Sampling temperature. Low values bias the model toward the strict
    /// JSON structure the prompt demands.
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "llama-3.1-8b-instant".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.1,
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// OpenAI-compatible `/chat/completions` client over reqwest.
#[derive(Clone)]
pub struct OpenAiChatClient {
    config: ChatClientConfig,
    client: Client,
}

impl OpenAiChatClient {
    /// Build a client from an explicit configuration.
    pub fn new(config: ChatClientConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Groq-hosted client (the default upstream for this crate).
    pub fn groq(api_key: &str) -> Result<Self, LlmError> {
        Self::new(ChatClientConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        })
    }

    /// api.openai.com client.
    pub fn openai(api_key: &str) -> Result<Self, LlmError> {
        Self::new(ChatClientConfig {
            api_key: api_key.to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
            usage: Option<TokenUsage>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => LlmError::RateLimitExceeded,
                401 => LlmError::InvalidApiKey,
                _ => LlmError::ApiError(format!("Status {}: {}", status, body)),
            });
        }

        let parsed: ChatResponse = response.json().await?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: parsed.usage,
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
