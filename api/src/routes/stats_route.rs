//! GET /stats: corpus size and active model.

use std::sync::Arc;

use axum::{Json, extract::State};
use knowledge_base::KnowledgeBaseStats;
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub knowledge_base: KnowledgeBaseStats,
    pub config: StatsConfig,
}

#[derive(Debug, Serialize)]
pub struct StatsConfig {
    pub model: String,
    pub provider: String,
}

/// Handler: GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        knowledge_base: state.orchestrator.knowledge_base().stats(),
        config: StatsConfig {
            model: state.model().to_string(),
            provider: state.provider.to_string(),
        },
    })
}
