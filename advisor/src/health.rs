//! Liveness probe for the generation backend.
//!
//! The probe sends one synthetic question through the same generator the
//! request path uses, so it exercises credentials, routing and the model.
//! It is never called while answering a client.

use std::{sync::Arc, time::Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::generator::AnswerGenerator;

pub const PROBE_QUERY: &str = "Test";
pub const PROBE_CONTEXT: &str = "Test information";

/// A serializable health snapshot of the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmHealth {
    /// `true` iff the probe returned a non-empty answer.
    pub ok: bool,
    /// Model identifier the probe ran against.
    pub model: String,
    /// Wall-clock duration of the probe, retries included.
    pub latency_ms: u128,
}

pub struct HealthProber {
    generator: Arc<dyn AnswerGenerator>,
}

impl HealthProber {
    pub fn new(generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails; any error counts as unhealthy.
    pub async fn probe(&self) -> bool {
        self.report().await.ok
    }

    pub async fn report(&self) -> LlmHealth {
        let started = Instant::now();
        let result = self
            .generator
            .generate(PROBE_QUERY, Some(PROBE_CONTEXT))
            .await;
        let latency_ms = started.elapsed().as_millis();
        let model = self.generator.model().to_string();

        match result {
            Ok(answer) if !answer.is_empty() => {
                info!(%model, latency_ms, "health probe completed");
                LlmHealth {
                    ok: true,
                    model,
                    latency_ms,
                }
            }
            Ok(_) => {
                warn!(%model, latency_ms, "health probe got an empty answer");
                LlmHealth {
                    ok: false,
                    model,
                    latency_ms,
                }
            }
            Err(err) => {
                warn!(%model, latency_ms, error = %err, "health probe failed");
                LlmHealth {
                    ok: false,
                    model,
                    latency_ms,
                }
            }
        }
    }
}
