//! GET /health: knowledge-base size plus a live generation probe.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the probe answered, `degraded` otherwise.
    pub status: &'static str,
    pub components: Components,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Components {
    pub knowledge_base: KnowledgeBaseHealth,
    pub llm_client: LlmClientHealth,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeBaseHealth {
    pub status: &'static str,
    pub documents: usize,
    pub embedding_dimension: usize,
}

#[derive(Debug, Serialize)]
pub struct LlmClientHealth {
    pub status: &'static str,
    pub model: String,
    pub latency_ms: u128,
}

/// Handler: GET /health
///
/// Always `200`; a failed probe only downgrades `status`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let kb = state.orchestrator.knowledge_base().stats();
    let llm = state.prober.report().await;

    Json(HealthResponse {
        status: if llm.ok { "healthy" } else { "degraded" },
        components: Components {
            knowledge_base: KnowledgeBaseHealth {
                status: "healthy",
                documents: kb.total_documents,
                embedding_dimension: kb.embedding_dimension,
            },
            llm_client: LlmClientHealth {
                status: if llm.ok { "healthy" } else { "error" },
                model: llm.model,
                latency_ms: llm.latency_ms,
            },
        },
        version: env!("CARGO_PKG_VERSION"),
    })
}
