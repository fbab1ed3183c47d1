use std::time::Duration;

use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Sampling temperature: low, to keep answers factual.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Output budget per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 800;
/// Nucleus sampling cutoff.
pub const DEFAULT_TOP_P: f32 = 0.9;
/// Per-attempt deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Upper bound of concurrent requests to the completion endpoint.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Configuration for the chat-completions endpoint.
///
/// # Fields
///
/// - `provider`: upstream provider behind the proxy.
/// - `model`: model identifier (e.g., `"gpt-3.5-turbo"`).
/// - `endpoint`: base URL ending in `/v1`; the client appends `/chat/completions`.
/// - `api_key`: bearer token; `None` makes every generation fail fast as unconfigured.
/// - `max_tokens`, `temperature`, `top_p`: fixed sampling knobs sent with each request.
/// - `timeout_secs`: per-attempt deadline.
/// - `max_connections`: size of the shared request gate.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig::new(
///     LlmProvider::OpenAI,
///     "gpt-3.5-turbo",
///     "https://api.proxyapi.ru/openai/v1",
///     Some("sk-test".to_string()),
/// );
/// assert_eq!(cfg.chat_url(), "https://api.proxyapi.ru/openai/v1/chat/completions");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The upstream provider.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Base URL of the OpenAI-compatible API (`.../v1`).
    pub endpoint: String,

    /// Optional API key for bearer authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling parameter.
    pub top_p: f32,

    /// Per-attempt timeout (in seconds).
    pub timeout_secs: u64,

    /// Bound on concurrent in-flight requests.
    pub max_connections: usize,
}

impl LlmModelConfig {
    /// Builds a config with the default sampling constants and limits.
    pub fn new(
        provider: LlmProvider,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Full URL of the chat-completions route.
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Per-attempt deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a non-blank API key is present.
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Checks the values that would otherwise surface as confusing runtime errors.
    ///
    /// # Errors
    /// Returns a config error for an empty model, a non-HTTP endpoint, sampling
    /// values outside their ranges, or zero limits.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("PROXYAPI_BASE", self.endpoint.trim())?;
        validate_range_f32("temperature", self.temperature, 0.0, 2.0)?;
        validate_range_f32("top_p", self.top_p, 0.0, 1.0)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout_secs",
                detail: "must be > 0",
            }
            .into());
        }
        if self.max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_connections",
                detail: "must be > 0",
            }
            .into());
        }
        Ok(())
    }
}
