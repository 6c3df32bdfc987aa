//! Multimodal chat model trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PrismResult;
use crate::types::{ImageReference, Message};

/// Response from a chat model call.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Generated text content.
    pub content: Option<String>,
    /// Token usage statistics.
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    /// Create a response with the given content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            usage: None,
        }
    }

    /// Get the content or an empty string.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens.
    pub total_tokens: u32,
}

/// Per-call overrides for generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

/// A chat model that accepts images alongside the message list.
///
/// One call is one request and one response: no streaming, no retries.
#[async_trait]
pub trait MultimodalLlm: Send + Sync {
    /// Send `messages` with `images` attached as visual inputs.
    async fn chat(
        &self,
        messages: &[Message],
        images: &[ImageReference],
        options: Option<GenerationOptions>,
    ) -> PrismResult<LlmResponse>;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Check if this model accepts image inputs.
    fn supports_vision(&self) -> bool {
        true
    }
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Attach images to requests. When off, image inputs are dropped.
    #[serde(default = "default_enable_vision")]
    pub enable_vision: bool,
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_enable_vision() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            enable_vision: default_enable_vision(),
        }
    }
}
