//! Type-erased TwiML handler functions.

use std::fmt;
use std::sync::Arc;

use super::context::{Context, RequestContext};
use super::form::FormValues;

/// A shareable TwiML handler.
///
/// Wraps any `Fn(&mut dyn Context)` so it can be cloned into every request.
#[derive(Clone)]
pub struct HandlerFunc {
    inner: Arc<dyn Fn(&mut dyn Context) + Send + Sync>,
}

impl HandlerFunc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Context) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Run the handler against `form` and return the closed envelope.
    pub fn serve(&self, form: FormValues) -> String {
        let mut ctx = RequestContext::new(form);
        (self.inner)(&mut ctx);
        ctx.finish()
    }
}

impl fmt::Debug for HandlerFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFunc").finish_non_exhaustive()
    }
}
