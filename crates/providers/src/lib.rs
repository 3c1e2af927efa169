//! Completion provider implementations for rosterhub.
//!
//! All providers implement the `rosterhub_core::Provider` trait. The service
//! dispatches to exactly one configured provider; which one is deployment
//! configuration, not a request-time choice.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use rosterhub_config::AppConfig;
use rosterhub_core::Provider;
use std::sync::Arc;

/// Build the configured provider, or `None` when no credential is set.
///
/// The chat gateway turns `None` into a `ConfigurationMissing` failure at
/// request time, so a keyless deployment still boots and serves the record
/// endpoints.
pub fn from_config(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let api_key = config.api_key.clone()?;

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let provider = OpenAiCompatProvider::new(&config.provider, base_url, api_key)
        .with_attribution(config.referer.clone(), Some(config.app_title.clone()));

    Some(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn no_key_means_no_provider() {
        let config = AppConfig::default();
        assert!(from_config(&config).is_none());
    }

    #[test]
    fn key_builds_configured_provider() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "openrouter");
    }

    #[test]
    fn explicit_api_url_wins() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            api_url: Some("http://localhost:8000/v1".into()),
            ..AppConfig::default()
        };
        assert!(from_config(&config).is_some());
    }
}
