//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums: [`ConfigError`]
//! for startup/validation problems and [`GenerationError`] for the typed failure
//! kinds a chat completion can end with. Small helpers for reading/validating
//! environment variables are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of characters kept from an upstream error body.
pub const SNIPPET_MAX_CHARS: usize = 200;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
///
/// Variants wrap domain-specific enums (config/generation) and the HTTP
/// transport error raised while building the shared client.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A chat completion ended without an answer.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Underlying HTTP transport error (e.g., client builder failure).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_PROVIDER`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `PROXYAPI_BASE`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty or invalid.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,

    /// The API token cannot be carried in an HTTP header.
    #[error("[AI LLM Service] API token contains characters not allowed in a header")]
    InvalidToken,
}

/* ------------------------------------------------------------------------- */
/* Generation errors                                                         */
/* ------------------------------------------------------------------------- */

/// Typed failure kinds of a chat completion.
///
/// Callers pick a fallback by matching on the variant; the display strings
/// are for logs only.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No API token configured; no request was sent.
    #[error("[AI LLM Service] API token is not configured")]
    Unconfigured,

    /// Connection/transport failure on the last attempt.
    #[error("[AI LLM Service] network error: {0}")]
    Network(String),

    /// The last attempt exceeded the per-attempt deadline.
    #[error("[AI LLM Service] request timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream rejected the request with a non-retryable status.
    #[error("[AI LLM Service] API error {status}: {excerpt}")]
    Api {
        /// Numeric HTTP status code.
        status: u16,
        /// Leading part of the response body, at most [`SNIPPET_MAX_CHARS`].
        excerpt: String,
    },

    /// Every attempt was consumed by rate limiting.
    #[error("[AI LLM Service] gave up after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts issued.
        attempts: u32,
    },

    /// A 200 response without a usable `choices[0].message.content`.
    #[error("[AI LLM Service] malformed completion response: {0}")]
    MalformedResponse(String),

    /// The client was drained; no new attempts are accepted.
    #[error("[AI LLM Service] client is shut down")]
    ShutDown,
}

impl GenerationError {
    /// Whether this kind is worth another attempt with a fixed delay.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Network(_) | GenerationError::Timeout(_))
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an optional, non-empty environment variable (`None` if unset/blank).
pub fn env_opt(name: &'static str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match env_opt(name) {
        Some(v) => v.parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::OutOfRange`] if `value`
/// is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Cuts an upstream body down to [`SNIPPET_MAX_CHARS`] characters.
///
/// Counts characters, not bytes, so multi-byte bodies are never split.
pub fn make_snippet(body: &str) -> String {
    body.chars().take(SNIPPET_MAX_CHARS).collect()
}
