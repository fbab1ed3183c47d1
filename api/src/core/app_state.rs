use std::net::{IpAddr, SocketAddr};

use advisor::{ChatOrchestrator, HealthProber};
use ai_llm_service::LlmProvider;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Request pipeline (knowledge base + generator).
    pub orchestrator: ChatOrchestrator,
    /// Synthetic round-trip used by `/health`.
    pub prober: HealthProber,
    /// Provider id reported by `/stats`.
    pub provider: LlmProvider,
}

impl AppState {
    pub fn new(orchestrator: ChatOrchestrator, provider: LlmProvider) -> Self {
        let prober = HealthProber::new(orchestrator.generator().clone());
        Self {
            orchestrator,
            prober,
            provider,
        }
    }

    /// Model id of the generator behind the pipeline.
    pub fn model(&self) -> &str {
        self.orchestrator.generator().model()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid HOST `{0}`: expected an IP address")]
    InvalidHost(String),

    #[error("invalid PORT `{0}`: expected 0-65535")]
    InvalidPort(String),
}

/// Listen address of the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Reads `HOST` and `PORT`, defaulting to `127.0.0.1:8000`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var("HOST").ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
        )
    }

    pub fn from_parts(host: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let host = host.map(str::trim).filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host.to_string()))?;

        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(p.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: SocketAddr::new(ip, port),
        })
    }
}
