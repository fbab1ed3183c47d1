//! Chat-completions client for the fund advisor.
//!
//! - [`services::open_ai_service::OpenAiService`] owns the shared HTTP pool and
//!   runs completions through the retry table in [`services::retry`].
//! - [`error_handler::GenerationError`] is the typed failure set callers match on.
//! - [`config::default_config::config_from_env`] builds the config from the environment.
//! - [`telemetry`] provides the log formatting used by the binary.

pub mod chat;
pub mod error_handler;
pub mod telemetry;

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod open_ai_service;
    pub mod retry;
}

pub use chat::{ChatMessage, Role};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, GenerationError};
pub use services::open_ai_service::OpenAiService;
pub use services::retry::{AttemptOutcome, RetryPolicy, RetryReport};
