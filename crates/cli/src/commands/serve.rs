//! `rosterhub serve` — start the HTTP API server.

use std::sync::Arc;

use rosterhub_chat::{CompletionGateway, PromptBuilder};
use rosterhub_config::AppConfig;
use rosterhub_gateway::AppState;
use rosterhub_store::{JsonFileMirror, RecordStore};
use tracing::{info, warn};

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let provider = rosterhub_providers::from_config(&config);
    if provider.is_none() {
        warn!("No API key configured; /chat will answer with an error until one is set");
    }

    let mirror = JsonFileMirror::new(config.store.path.clone());
    let store = RecordStore::open(Box::new(mirror), config.store.validation);
    info!(
        records = store.count().await,
        path = %config.store.path.display(),
        "Record store opened"
    );

    let state = Arc::new(AppState {
        store,
        prompts: PromptBuilder::new(config.store.prompt_record_cap),
        completions: CompletionGateway::new(provider, &config),
    });

    let router = rosterhub_gateway::build_router(state, &config);
    rosterhub_gateway::serve(router, &config.gateway.host, config.gateway.port).await?;

    Ok(())
}
