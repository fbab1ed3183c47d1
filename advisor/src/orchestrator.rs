//! Request pipeline: retrieve → prompt → generate → (answer | fallback).

use std::{sync::Arc, time::Instant};

use ai_llm_service::GenerationError;
use knowledge_base::KnowledgeBase;
use tracing::{debug, error, info, warn};

use crate::{
    error::AdvisorError,
    generator::AnswerGenerator,
    query::Query,
    response::{ChatResponse, fallback_answer},
};

/// Passages requested from the knowledge base per question.
pub const DEFAULT_TOP_K: usize = 3;

const LOG_PREVIEW_CHARS: usize = 50;

/// Wires retrieval and generation for one question at a time.
///
/// Cheap to share: both collaborators sit behind `Arc`.
#[derive(Clone)]
pub struct ChatOrchestrator {
    kb: Arc<dyn KnowledgeBase>,
    generator: Arc<dyn AnswerGenerator>,
    top_k: usize,
}

impl ChatOrchestrator {
    pub fn new(kb: Arc<dyn KnowledgeBase>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            kb,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn knowledge_base(&self) -> &Arc<dyn KnowledgeBase> {
        &self.kb
    }

    pub fn generator(&self) -> &Arc<dyn AnswerGenerator> {
        &self.generator
    }

    /// Validates `raw` and answers it.
    ///
    /// # Errors
    /// - [`AdvisorError::InvalidQuery`] before any retrieval or generation
    /// - [`AdvisorError::Internal`] as in [`ChatOrchestrator::handle`]
    pub async fn ask(&self, raw: &str) -> Result<ChatResponse, AdvisorError> {
        let received = Instant::now();
        let query = Query::parse(raw).inspect_err(|e| {
            warn!(error = %e, "rejected query");
        })?;
        self.answer(&query, received).await
    }

    /// Answers a validated query.
    ///
    /// Generation failures never surface: they become a fallback answer that
    /// echoes the retrieved context, or refers the client to a specialist.
    ///
    /// # Errors
    /// [`AdvisorError::Internal`] when retrieval fails, or when retrieval or
    /// generation panics.
    pub async fn handle(&self, query: &Query) -> Result<ChatResponse, AdvisorError> {
        self.answer(query, Instant::now()).await
    }

    /// `processing_time` is measured from `received`.
    async fn answer(
        &self,
        query: &Query,
        received: Instant,
    ) -> Result<ChatResponse, AdvisorError> {
        info!(query = %query.preview(LOG_PREVIEW_CHARS), "chat request received");

        let context = self.retrieve(query).await?;
        let context_found = context.is_some();
        debug!(context_found, "knowledge base searched");

        let response_text = match self.generate(query, context.clone()).await? {
            Ok(answer) => answer,
            Err(err) => {
                error!(error = %err, context_found, "generation failed, serving fallback");
                fallback_answer(context.as_deref())
            }
        };

        let processing_time = received.elapsed();
        info!(
            context_found,
            elapsed_s = processing_time.as_secs_f64(),
            "chat request processed"
        );

        Ok(ChatResponse {
            response_text,
            context_found,
            processing_time,
        })
    }

    /// Runs the synchronous search on the blocking pool; empty text is `None`.
    async fn retrieve(&self, query: &Query) -> Result<Option<String>, AdvisorError> {
        let kb = Arc::clone(&self.kb);
        let text = query.as_str().to_owned();
        let top_k = self.top_k;

        let context = tokio::task::spawn_blocking(move || kb.search(&text, top_k))
            .await
            .map_err(|e| {
                error!(error = %e, "retrieval task aborted");
                AdvisorError::Internal(format!("retrieval task aborted: {e}"))
            })?
            .map_err(|e| {
                error!(error = %e, "retrieval failed");
                AdvisorError::Internal(format!("retrieval failed: {e}"))
            })?;

        Ok((!context.is_empty()).then_some(context))
    }

    /// Runs generation on its own task; a panic there becomes `Internal`.
    async fn generate(
        &self,
        query: &Query,
        context: Option<String>,
    ) -> Result<Result<String, GenerationError>, AdvisorError> {
        let generator = Arc::clone(&self.generator);
        let text = query.as_str().to_owned();

        tokio::spawn(async move { generator.generate(&text, context.as_deref()).await })
            .await
            .map_err(|e| {
                error!(error = %e, "generation task aborted");
                AdvisorError::Internal(format!("generation task aborted: {e}"))
            })
    }
}
