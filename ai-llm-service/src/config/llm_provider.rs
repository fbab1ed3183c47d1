use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Upstream provider routed through the OpenAI-compatible proxy.
///
/// The provider id becomes a path segment of the base URL:
/// `{proxy_base}/{provider}/v1`.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let p: LlmProvider = "openai".parse().unwrap();
/// assert_eq!(p.path_segment(), "openai");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI models (`gpt-*`).
    OpenAI,
    /// DeepSeek models, served with the same chat-completions schema.
    DeepSeek,
}

impl LlmProvider {
    /// Path segment used in the proxy URL.
    pub fn path_segment(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAI),
            "deepseek" => Ok(LlmProvider::DeepSeek),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<LlmProvider>(), Ok(LlmProvider::OpenAI));
        assert_eq!(" deepseek ".parse::<LlmProvider>(), Ok(LlmProvider::DeepSeek));
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!(
            "anthropic".parse::<LlmProvider>(),
            Err(ConfigError::UnsupportedProvider("anthropic".into()))
        );
    }
}
