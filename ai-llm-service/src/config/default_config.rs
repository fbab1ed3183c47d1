//! LLM config loaded from environment variables.
//!
//! The completion endpoint is an OpenAI-compatible proxy that routes to an
//! upstream provider by path: `{PROXYAPI_BASE}/{LLM_PROVIDER}/v1`.
//!
//! # Environment variables
//!
//! - `PROXYAPI_TOKEN`      = bearer token (optional; unset means generation is unconfigured)
//! - `PROXYAPI_BASE`       = proxy base URL (default `https://api.proxyapi.ru`)
//! - `LLM_PROVIDER`        = `openai` | `deepseek` (default `openai`)
//! - `MODEL_NAME`          = model identifier (default `gpt-3.5-turbo`)
//! - `LLM_TIMEOUT_SECS`    = per-attempt deadline (default 30)
//! - `LLM_MAX_CONNECTIONS` = concurrent request bound (default 10)

use tracing::warn;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt, env_opt_u64, validate_http_endpoint},
};

/// Default proxy base URL.
pub const DEFAULT_PROXY_BASE: &str = "https://api.proxyapi.ru";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Builds the provider-scoped base URL, e.g. `https://api.proxyapi.ru/openai/v1`.
pub fn api_base_url(proxy_base: &str, provider: LlmProvider) -> String {
    format!(
        "{}/{}/v1",
        proxy_base.trim().trim_end_matches('/'),
        provider.path_segment()
    )
}

/// Constructs the chat-completions config from the environment.
///
/// A missing token is not an error here: the service starts, reports itself
/// as degraded, and answers with fallback text.
///
/// # Errors
///
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::InvalidFormat`] if `PROXYAPI_BASE` is not http(s)
/// - [`ConfigError::InvalidNumber`] for non-numeric limits
/// - any error from [`LlmModelConfig::validate`]
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let proxy_base = env_opt("PROXYAPI_BASE").unwrap_or_else(|| DEFAULT_PROXY_BASE.to_string());
    validate_http_endpoint("PROXYAPI_BASE", &proxy_base)?;

    let provider = match env_opt("LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::OpenAI,
    };
    let model = env_opt("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let api_key = env_opt("PROXYAPI_TOKEN");
    if api_key.is_none() {
        warn!("PROXYAPI_TOKEN is not set; answers will use fallback text");
    }

    let mut cfg = LlmModelConfig::new(provider, model, api_base_url(&proxy_base, provider), api_key);

    if let Some(secs) = env_opt_u64("LLM_TIMEOUT_SECS")? {
        cfg.timeout_secs = secs;
    }
    if let Some(n) = env_opt_u64("LLM_MAX_CONNECTIONS")? {
        cfg.max_connections = usize::try_from(n).map_err(|_| ConfigError::InvalidNumber {
            var: "LLM_MAX_CONNECTIONS",
            reason: "does not fit in usize",
        })?;
    }

    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_includes_provider_and_version() {
        assert_eq!(
            api_base_url("https://api.proxyapi.ru/", LlmProvider::OpenAI),
            "https://api.proxyapi.ru/openai/v1"
        );
        assert_eq!(
            api_base_url("http://localhost:9000", LlmProvider::DeepSeek),
            "http://localhost:9000/deepseek/v1"
        );
    }
}
