//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation to a chat-completion endpoint
//! and return the completion. The chat gateway calls `complete()` without
//! knowing which backend is configured, and tests substitute a stub.

use crate::error::ProviderError;
use crate::message::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g. "mistralai/mistral-7b-instruct")
    pub model: String,

    /// The conversation, in order
    pub messages: Vec<ChatTurn>,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.2
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The first completion's textual content, if the provider returned any.
    pub content: Option<String>,

    /// Which model actually responded (may differ from requested).
    pub model: String,
}

/// The core Provider trait.
///
/// Every chat-completion backend (OpenRouter, OpenAI, any compatible endpoint)
/// implements this trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}
