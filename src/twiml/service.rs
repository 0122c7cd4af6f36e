//! Axum glue: turns a [`HandlerFunc`] into a route.
//!
//! # Data Flow
//! ```text
//! Request
//!     → FormValues::from_request (query + urlencoded body)
//!     → HandlerFunc::serve on the blocking pool
//!       (open envelope, run handler, close envelope)
//!     → single-write Response body
//! ```
//!
//! # Design Decisions
//! - Handlers are synchronous and may block, so they never run on an async
//!   worker; the server's request timeout keeps working while one is busy
//! - A body cut off by the size limit answers 413 without running the handler
//! - A panicking handler answers 500

use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};

use super::form::{FormError, FormValues};
use super::handler::HandlerFunc;
use crate::http::response::twiml_response;
use crate::observability::metrics;

/// Method router answering every HTTP method with `handler`.
///
/// `route` is used as the metrics/log label.
pub fn service<S>(route: impl Into<String>, handler: HandlerFunc) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let route: String = route.into();
    any(move |request: Request| {
        let handler = handler.clone();
        let route = route.clone();
        async move { dispatch(&route, handler, request).await }
    })
}

async fn dispatch(route: &str, handler: HandlerFunc, request: Request) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();

    let form = match FormValues::from_request(request).await {
        Ok(form) => form,
        Err(FormError::TooLarge) => {
            tracing::warn!(route = %route, method = %method, "Form body over size limit");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let xml = match tokio::task::spawn_blocking(move || handler.serve(form)).await {
        Ok(xml) => xml,
        Err(e) => {
            tracing::error!(route = %route, method = %method, error = %e, "TwiML handler failed");
            metrics::record_request(route, start_time);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::debug!(
        route = %route,
        method = %method,
        bytes = xml.len(),
        "Served TwiML response"
    );
    metrics::record_request(route, start_time);

    twiml_response(xml)
}
