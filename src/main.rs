use std::sync::Arc;

use advisor::{ChatOrchestrator, LlmAnswerGenerator};
use ai_llm_service::{OpenAiService, config::default_config::config_from_env, telemetry};
use anyhow::Context;
use api::{AppState, ServerConfig};
use knowledge_base::{InMemoryKnowledgeBase, KnowledgeBaseConfig};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment may carry everything.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let llm_cfg = config_from_env().context("invalid LLM configuration")?;
    let provider = llm_cfg.provider;
    let service = Arc::new(OpenAiService::new(llm_cfg).context("failed to build LLM client")?);

    let kb_cfg = KnowledgeBaseConfig::from_env().context("invalid knowledge base configuration")?;
    let kb = InMemoryKnowledgeBase::load(&kb_cfg)
        .with_context(|| format!("failed to load knowledge base from {}", kb_cfg.path.display()))?;

    let orchestrator = ChatOrchestrator::new(
        Arc::new(kb),
        Arc::new(LlmAnswerGenerator::new(Arc::clone(&service))),
    );
    let state = Arc::new(AppState::new(orchestrator, provider));
    let server_cfg = ServerConfig::from_env().context("invalid HOST/PORT")?;

    info!(
        model = %service.model(),
        %provider,
        addr = %server_cfg.addr,
        "starting fund advisor"
    );

    api::start(state, server_cfg).await?;

    service.shutdown().await;
    Ok(())
}
