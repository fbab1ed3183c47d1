//! Typed error for the advisor crate.

use thiserror::Error;

use crate::query::QueryError;

/// Ways a chat request can fail visibly.
///
/// Generation failures never appear here; the orchestrator turns them into a
/// fallback answer.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The raw text is not an acceptable question.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// Unexpected fault inside the pipeline (retrieval error, task panic).
    #[error("internal fault: {0}")]
    Internal(String),
}
