//! Completion dispatch toward the single configured provider.

use std::sync::Arc;

use rosterhub_config::AppConfig;
use rosterhub_core::error::ProviderError;
use rosterhub_core::message::ChatTurn;
use rosterhub_core::provider::{Provider, ProviderRequest};
use rosterhub_core::result::ProviderResult;
use tracing::{debug, warn};

/// Fallback reply when the provider answers successfully but returns no text.
const EMPTY_COMPLETION_FALLBACK: &str = "No content returned. Try rephrasing your question.";

/// Sends assembled conversations to the configured provider.
///
/// Exactly one provider is configured per deployment; when credentials are
/// missing the gateway is constructed without one and every `send` reports
/// `ConfigurationMissing` without touching the network. All outcomes are
/// folded into [`ProviderResult`] so the HTTP layer has one shape to map.
pub struct CompletionGateway {
    provider: Option<Arc<dyn Provider>>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl CompletionGateway {
    pub fn new(provider: Option<Arc<dyn Provider>>, config: &AppConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
        }
    }

    /// Whether a provider is configured and sends will go upstream.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// The model every request is sent with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one conversation and normalize the outcome.
    ///
    /// Turn order is fixed: system turn, then `prior_turns` in the order the
    /// caller supplied them, then the user turn. No retries; a failed send
    /// is reported as-is.
    pub async fn send(
        &self,
        system: &str,
        user: &str,
        prior_turns: Vec<ChatTurn>,
    ) -> ProviderResult {
        let Some(provider) = &self.provider else {
            return ProviderResult::from(ProviderError::NotConfigured(
                "No API key configured. Set ROSTERHUB_API_KEY or OPENROUTER_API_KEY.".to_string(),
            ));
        };

        let mut messages = Vec::with_capacity(prior_turns.len() + 2);
        messages.push(ChatTurn::system(system));
        messages.extend(prior_turns);
        messages.push(ChatTurn::user(user));

        debug!(
            provider = provider.name(),
            model = %self.model,
            turns = messages.len(),
            "Dispatching completion"
        );

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match provider.complete(request).await {
            Ok(response) => {
                let message = match response.content {
                    Some(text) if !text.trim().is_empty() => text,
                    _ => EMPTY_COMPLETION_FALLBACK.to_string(),
                };
                ProviderResult::Success { message }
            }
            Err(error) => {
                warn!(provider = provider.name(), %error, "Completion failed");
                ProviderResult::from(error)
            }
        }
    }
}
