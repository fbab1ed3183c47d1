//! Answer generation seam.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::{GenerationError, OpenAiService};

use crate::prompt::build_messages;

/// Produces an answer for a question and its optional context.
///
/// Object-safe so the orchestrator can hold `Arc<dyn AnswerGenerator>` and
/// tests can substitute scripted generators.
pub trait AnswerGenerator: Send + Sync {
    /// Model identifier, for health and stats output.
    fn model(&self) -> &str;

    fn generate<'a>(
        &'a self,
        query: &'a str,
        context: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

/// Grounded prompt + chat completion over a shared [`OpenAiService`].
#[derive(Clone)]
pub struct LlmAnswerGenerator {
    service: Arc<OpenAiService>,
}

impl LlmAnswerGenerator {
    pub fn new(service: Arc<OpenAiService>) -> Self {
        Self { service }
    }
}

impl AnswerGenerator for LlmAnswerGenerator {
    fn model(&self) -> &str {
        self.service.model()
    }

    fn generate<'a>(
        &'a self,
        query: &'a str,
        context: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(async move {
            let messages = build_messages(query, context);
            self.service.complete(&messages).await
        })
    }
}
