//! POST /chat: answers a question with knowledge-base context.

use std::sync::Arc;

use advisor::ChatResponse;
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::ChatRequest,
};

/// Handler: POST /chat
///
/// Generation failures still answer `200` with a fallback text; only invalid
/// input (`400`/`422`) and internal faults (`500`) are errors.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"query":"What is an investment unit?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    let response = state.orchestrator.ask(&body.query).await?;
    Ok(Json(response))
}
