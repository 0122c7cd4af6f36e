//! Path → handler registry.
//!
//! # Responsibilities
//! - Register TwiML handlers under URL paths
//! - Reject paths the router cannot serve before they reach Axum
//! - Produce the Axum `Router` the server runs
//!
//! # Design Decisions
//! - Explicit registry object, passed to the server at startup
//! - Immutable once handed to the server
//! - A path ending in `/` also serves everything beneath it
//! - Any HTTP method is accepted on a registered path

use axum::Router;
use thiserror::Error;

use crate::twiml::{service, Context, HandlerFunc};

/// Reasons a path cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("path `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("path `{0}` contains a segment the router cannot match literally")]
    InvalidSegment(String),

    #[error("path `{0}` is already registered")]
    Duplicate(String),
}

/// Registry of TwiML handlers.
#[derive(Debug, Default)]
pub struct TwimlRouter {
    router: Router,
    paths: Vec<String>,
}

impl TwimlRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `path`.
    ///
    /// A path ending in `/` is a subtree: `/calls/` also matches
    /// `/calls/status`.
    pub fn handle<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut dyn Context) + Send + Sync + 'static,
    {
        self.handle_func(path, HandlerFunc::new(f))
    }

    /// Register an already wrapped handler under `path`.
    pub fn handle_func(&mut self, path: &str, handler: HandlerFunc) -> Result<(), RouteError> {
        validate_path(path)?;
        if self.paths.iter().any(|p| p == path) {
            return Err(RouteError::Duplicate(path.to_string()));
        }

        let mut router = std::mem::take(&mut self.router)
            .route(path, service(path, handler.clone()));
        if path.ends_with('/') {
            router = router.route(&format!("{path}{{*rest}}"), service(path, handler));
        }
        self.router = router;
        self.paths.push(path.to_string());

        tracing::debug!(path = %path, "Registered TwiML handler");
        Ok(())
    }

    /// Registered paths, in registration order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

fn validate_path(path: &str) -> Result<(), RouteError> {
    if !path.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(path.to_string()));
    }
    let literal = path
        .split('/')
        .all(|segment| !segment.starts_with(':') && !segment.contains(['{', '}', '*']));
    if !literal {
        return Err(RouteError::InvalidSegment(path.to_string()));
    }
    Ok(())
}
