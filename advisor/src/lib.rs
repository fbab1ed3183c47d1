//! Question answering over the fund knowledge base.
//!
//! Public API: [`ChatOrchestrator::ask`]. It validates the question, retrieves
//! top-K context from a [`knowledge_base::KnowledgeBase`], builds a grounded
//! prompt, calls the [`AnswerGenerator`], and falls back to a local answer
//! when generation fails.

mod error;
mod generator;
mod health;
mod orchestrator;
pub mod prompt;
mod query;
mod response;

pub use error::AdvisorError;
pub use generator::{AnswerGenerator, LlmAnswerGenerator};
pub use health::{HealthProber, LlmHealth, PROBE_CONTEXT, PROBE_QUERY};
pub use orchestrator::{ChatOrchestrator, DEFAULT_TOP_K};
pub use query::{MAX_QUERY_CHARS, Query, QueryError};
pub use response::{ChatResponse, INTERNAL_ERROR_MESSAGE, fallback_answer};
