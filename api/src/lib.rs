//! HTTP surface of the fund advisor.
//!
//! Routes:
//! - `POST /chat`: answer a question
//! - `GET /health`: knowledge-base size and a live generation probe
//! - `GET /stats`: corpus size and active model
//! - `GET /`: minimal chat page

use std::sync::Arc;

pub mod core {
    pub mod app_state;
}
pub mod error_handler;

mod routes {
    pub mod chat {
        pub mod chat_request;
        pub mod chat_route;
    }
    pub mod health_route;
    pub mod index_route;
    pub mod stats_route;
}

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::core::app_state::{AppState, ConfigError, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{
    chat::chat_route::chat, health_route::health, index_route::index, stats_route::stats,
};

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until Ctrl+C, then returns after in-flight requests complete.
///
/// # Errors
/// [`AppError::Bind`] if the address is unavailable, [`AppError::Server`] on
/// I/O failure while serving.
pub async fn start(state: Arc<AppState>, cfg: ServerConfig) -> AppResult<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(cfg.addr)
        .await
        .map_err(AppError::Bind)?;
    info!(addr = %cfg.addr, "HTTP server listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin};

    use advisor::{AnswerGenerator, ChatOrchestrator, INTERNAL_ERROR_MESSAGE};
    use ai_llm_service::{GenerationError, LlmProvider};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use knowledge_base::{KnowledgeBase, KnowledgeBaseError, KnowledgeBaseStats};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    struct StaticKb(Option<&'static str>);

    impl KnowledgeBase for StaticKb {
        fn search(&self, _query: &str, _top_k: usize) -> Result<String, KnowledgeBaseError> {
            match self.0 {
                Some(ctx) => Ok(ctx.to_string()),
                None => Err(KnowledgeBaseError::Config("index unavailable".into())),
            }
        }

        fn stats(&self) -> KnowledgeBaseStats {
            KnowledgeBaseStats {
                total_documents: 10,
                embedding_dimension: 384,
            }
        }
    }

    struct StaticGenerator(Result<String, GenerationError>);

    impl AnswerGenerator for StaticGenerator {
        fn model(&self) -> &str {
            "gpt-3.5-turbo"
        }

        fn generate<'a>(
            &'a self,
            _query: &'a str,
            _context: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
            Box::pin(async move { self.0.clone() })
        }
    }

    struct PanickingGenerator;

    impl AnswerGenerator for PanickingGenerator {
        fn model(&self) -> &str {
            "gpt-3.5-turbo"
        }

        fn generate<'a>(
            &'a self,
            _query: &'a str,
            _context: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
            panic!("decoder state corrupted")
        }
    }

    fn app(kb: Option<&'static str>, answer: Result<String, GenerationError>) -> Router {
        let orchestrator =
            ChatOrchestrator::new(Arc::new(StaticKb(kb)), Arc::new(StaticGenerator(answer)));
        router(Arc::new(AppState::new(orchestrator, LlmProvider::OpenAI)))
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn chat_answers_with_context() {
        let res = app(Some("Units are securities."), Ok("A unit is a security.".into()))
            .oneshot(post_chat(r#"{"query":"What is a unit?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["response"], "A unit is a security.");
        assert_eq!(v["context_found"], true);
        assert!(v["processing_time"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn chat_generation_failure_is_still_ok() {
        let res = app(Some(""), Err(GenerationError::Unconfigured))
            .oneshot(post_chat(r#"{"query":"What is a unit?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["context_found"], false);
        assert!(v["response"].as_str().unwrap().contains("specialist"));
    }

    #[tokio::test]
    async fn blank_query_is_unprocessable() {
        let res = app(Some(""), Ok("unused".into()))
            .oneshot(post_chat(r#"{"query":"   "}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(res).await["error"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn oversized_query_is_unprocessable() {
        let body = serde_json::json!({ "query": "a".repeat(1001) }).to_string();
        let res = app(Some(""), Ok("unused".into()))
            .oneshot(post_chat(&body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let res = app(Some(""), Ok("unused".into()))
            .oneshot(post_chat(r#"{"query": "#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn retrieval_fault_is_internal_error_without_detail() {
        let res = app(None, Ok("unused".into()))
            .oneshot(post_chat(r#"{"query":"What is a unit?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = json_body(res).await;
        assert_eq!(v["error"], "INTERNAL_ERROR");
        assert_eq!(v["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn generation_panic_is_internal_error() {
        let orchestrator = ChatOrchestrator::new(
            Arc::new(StaticKb(Some("Units are securities."))),
            Arc::new(PanickingGenerator),
        );
        let app = router(Arc::new(AppState::new(orchestrator, LlmProvider::OpenAI)));

        let res = app
            .oneshot(post_chat(r#"{"query":"What is a unit?"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = json_body(res).await;
        assert_eq!(v["error"], "INTERNAL_ERROR");
        assert_eq!(v["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn health_reports_degraded_llm() {
        let res = app(Some(""), Err(GenerationError::Unconfigured))
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["status"], "degraded");
        assert_eq!(v["components"]["llm_client"]["status"], "error");
        assert_eq!(v["components"]["llm_client"]["model"], "gpt-3.5-turbo");
        assert_eq!(v["components"]["knowledge_base"]["documents"], 10);
    }

    #[tokio::test]
    async fn health_reports_healthy_llm() {
        let res = app(Some(""), Ok("pong".into()))
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(json_body(res).await["status"], "healthy");
    }

    #[tokio::test]
    async fn stats_shape() {
        let res = app(Some(""), Ok("unused".into()))
            .oneshot(get_request("/stats"))
            .await
            .unwrap();

        let v = json_body(res).await;
        assert_eq!(
            v,
            serde_json::json!({
                "knowledge_base": { "total_documents": 10, "embedding_dimension": 384 },
                "config": { "model": "gpt-3.5-turbo", "provider": "openai" }
            })
        );
    }

    #[tokio::test]
    async fn index_serves_html() {
        let res = app(Some(""), Ok("unused".into()))
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("fetch('/chat'"));
    }
}
