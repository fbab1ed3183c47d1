use serde::Deserialize;

/// Request payload for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Client question, validated by the orchestrator.
    pub query: String,
}
