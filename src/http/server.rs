//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the registered TwiML routes in the middleware stack
//!   (request ID, tracing, timeout, body limit, content type)
//! - Bind the server to a listener
//! - Stop accepting and drain in-flight requests on shutdown

use std::time::Duration;

use axum::{http::HeaderValue, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::content_type_layer;
use crate::routing::TwimlRouter;

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid response content type `{0}`")]
    InvalidContentType(String),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server hosting TwiML handlers.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(config: ServerConfig, routes: TwimlRouter) -> Result<Self, ServerError> {
        let content_type = HeaderValue::from_str(&config.response.content_type)
            .map_err(|_| ServerError::InvalidContentType(config.response.content_type.clone()))?;

        tracing::debug!(routes = ?routes.paths(), "Registering TwiML routes");

        let router = Self::build_router(&config, routes.into_router(), content_type);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, routes: Router, content_type: HeaderValue) -> Router {
        routes
            .layer(content_type_layer(content_type))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use crate::twiml::Context;
    use tower::ServiceExt;

    fn server(config: ServerConfig) -> HttpServer {
        let mut routes = TwimlRouter::new();
        routes.handle("/hangup", |ctx| ctx.hangup()).unwrap();
        routes
            .handle("/greet", |ctx| {
                let from = ctx.value("From");
                ctx.response(&format!("<Say>{from}</Say>"));
            })
            .unwrap();
        HttpServer::new(config, routes).unwrap()
    }

    fn form_post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_sets_content_type_and_request_id() {
        let res = server(ServerConfig::default())
            .router()
            .oneshot(Request::builder().uri("/hangup").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml; charset=utf-8"
        );
        assert!(res.headers().get("x-request-id").is_some());

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &body[..],
            br#"<?xml version="1.0" encoding="UTF-8"?><Response><Hangup/></Response>"#
        );
    }

    #[tokio::test]
    async fn test_preserves_client_request_id() {
        let res = server(ServerConfig::default())
            .router()
            .oneshot(
                Request::builder()
                    .uri("/hangup")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_custom_content_type() {
        let mut config = ServerConfig::default();
        config.response.content_type = "application/xml".to_string();

        let res = server(config)
            .router()
            .oneshot(Request::builder().uri("/hangup").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "application/xml");
    }

    #[test]
    fn test_rejects_invalid_content_type() {
        let mut config = ServerConfig::default();
        config.response.content_type = "text/xml\n".to_string();

        let result = HttpServer::new(config, TwimlRouter::new());
        assert!(matches!(result, Err(ServerError::InvalidContentType(_))));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = ServerConfig::default();
        config.limits.max_body_size = 16;

        let res = server(config)
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hangup")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .header("content-length", "64")
                    .body(Body::from(vec![b'a'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_limit_above_default() {
        let mut config = ServerConfig::default();
        config.limits.max_body_size = 32 << 20;

        let body = format!("From=alice&pad={}", "a".repeat(11 << 20));
        let res = server(config)
            .router()
            .oneshot(form_post("/greet", body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(body.ends_with(b"<Response><Say>alice</Say></Response>"));
    }

    #[tokio::test]
    async fn test_body_limit_without_content_length() {
        let mut config = ServerConfig::default();
        config.limits.max_body_size = 16;

        let res = server(config)
            .router()
            .oneshot(form_post("/greet", format!("From=alice&pad={}", "a".repeat(64))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
