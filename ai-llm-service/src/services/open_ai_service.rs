//! OpenAI-compatible chat-completions client.
//!
//! Minimal, non-streaming client around `POST {endpoint}/chat/completions`.
//! One instance owns the shared `reqwest::Client` (connection pool) and a
//! semaphore that bounds concurrent in-flight requests; wrap it in `Arc` and
//! share it across tasks.
//!
//! Constructor validation:
//! - `cfg` must pass [`LlmModelConfig::validate`]
//! - `cfg.api_key`, when present, must be a valid header value
//!
//! A missing API key is accepted at construction; [`OpenAiService::complete`]
//! then fails fast with [`GenerationError::Unconfigured`].

use std::time::Instant;

use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::{
    chat::ChatMessage,
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, ConfigError, GenerationError, make_snippet},
    services::retry::{AttemptOutcome, RetryPolicy, RetryReport, run_with_retry},
};

const USER_AGENT: &str = concat!("fund-advisor/", env!("CARGO_PKG_VERSION"));

/// Thin client for an OpenAI-compatible chat-completions API.
///
/// High-level operations:
/// - [`OpenAiService::complete`]: one completion with retries
/// - [`OpenAiService::shutdown`]: wait for in-flight requests, then refuse new ones
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    policy: RetryPolicy,
    gate: Semaphore,
    gate_size: u32,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// Builds an HTTP client with default headers (bearer auth when a key is
    /// configured) and a pool sized to `cfg.max_connections`.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the config is invalid or the key is not header-safe
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        if let Some(key) = cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", key.trim()))
                .map_err(|_| ConfigError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(cfg.timeout())
            .pool_max_idle_per_host(cfg.max_connections)
            .build()?;

        let gate_size = u32::try_from(cfg.max_connections.min(Semaphore::MAX_PERMITS))
            .unwrap_or(u32::MAX);

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            max_connections = gate_size,
            configured = cfg.has_credentials(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            url_chat: cfg.chat_url(),
            policy: RetryPolicy::standard(cfg.timeout()),
            gate: Semaphore::new(gate_size as usize),
            gate_size,
            cfg,
        })
    }

    /// Replaces the retry policy (mostly useful to shrink delays in tests).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.cfg.has_credentials()
    }

    /// Performs a **non-streaming** chat completion with retries.
    ///
    /// Returns the trimmed `choices[0].message.content`.
    ///
    /// # Errors
    /// Any [`GenerationError`] kind; see [`crate::services::retry`] for the
    /// attempt table.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        self.complete_with_report(messages).await.0
    }

    /// Same as [`OpenAiService::complete`], also returning attempts and waits.
    pub async fn complete_with_report(
        &self,
        messages: &[ChatMessage],
    ) -> (Result<String, GenerationError>, RetryReport) {
        if !self.is_configured() {
            error!(model = %self.cfg.model, "API token is not configured");
            return (Err(GenerationError::Unconfigured), RetryReport::default());
        }

        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, messages);
        let body = &body;

        debug!(
            model = %self.cfg.model,
            messages = messages.len(),
            prompt_chars = messages.iter().map(|m| m.content.chars().count()).sum::<usize>(),
            "POST {}", self.url_chat
        );

        let (result, report) = run_with_retry(&self.policy, move |_| self.attempt_once(body)).await;

        match &result {
            Ok(answer) => info!(
                model = %self.cfg.model,
                answer_chars = answer.chars().count(),
                attempts = report.attempts,
                latency_ms = started.elapsed().as_millis(),
                "chat completion completed"
            ),
            Err(err) => error!(
                model = %self.cfg.model,
                error = %err,
                attempts = report.attempts,
                waited_ms = report.waited.as_millis(),
                latency_ms = started.elapsed().as_millis(),
                "chat completion failed"
            ),
        }

        (result, report)
    }

    /// Waits until every in-flight attempt has finished, then closes the gate.
    ///
    /// Attempts started afterwards fail with [`GenerationError::ShutDown`].
    pub async fn shutdown(&self) {
        if let Ok(all) = self.gate.acquire_many(self.gate_size).await {
            self.gate.close();
            drop(all);
        }
        info!(model = %self.cfg.model, "OpenAiService drained");
    }

    /// Issues one request and classifies the result.
    async fn attempt_once(&self, body: &ChatCompletionRequest<'_>) -> AttemptOutcome {
        let Ok(_permit) = self.gate.acquire().await else {
            return GenerationError::ShutDown.into();
        };

        let resp = match self.client.post(&self.url_chat).json(body).send().await {
            Ok(resp) => resp,
            Err(e) => return self.classify_transport(&e).into(),
        };

        let status = resp.status();
        match resp.text().await {
            Ok(text) => classify_response(status, &text),
            Err(e) => self.classify_transport(&e).into(),
        }
    }

    fn classify_transport(&self, err: &reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.cfg.timeout())
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

/// Maps an HTTP status and body to an attempt outcome.
///
/// Only `200` is a success and only `429` is retried; every other status is
/// treated as a non-transient rejection.
pub fn classify_response(status: StatusCode, body: &str) -> AttemptOutcome {
    match status {
        StatusCode::OK => match serde_json::from_str::<ChatCompletionResponse>(body) {
            Ok(out) => match out.choices.into_iter().next().and_then(|c| c.message.content) {
                Some(content) => AttemptOutcome::Success(content.trim().to_string()),
                None => AttemptOutcome::Terminal(GenerationError::MalformedResponse(
                    "missing `choices[0].message.content`".into(),
                )),
            },
            Err(e) => AttemptOutcome::Terminal(GenerationError::MalformedResponse(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))),
        },
        StatusCode::TOO_MANY_REQUESTS => AttemptOutcome::RateLimited,
        other => AttemptOutcome::Terminal(GenerationError::Api {
            status: other.as_u16(),
            excerpt: make_snippet(body),
        }),
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, messages: &'a [ChatMessage]) -> Self {
        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            top_p: cfg.top_p,
        }
    }
}

/// Minimal response for `/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
