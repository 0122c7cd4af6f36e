//! TwiML response context and handler plumbing.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → form.rs (collect form values)
//!     → context.rs (RequestContext: form values + open envelope)
//!     → user handler (value / int_value / response / responsef / hangup)
//!     → envelope.rs (append </Response>, hand back one String)
//!     → service.rs (write the body to the transport)
//! ```
//!
//! # Design Decisions
//! - Handlers only see the `Context` trait, never the transport
//! - Output is buffered and flushed once, after the handler returns
//! - One context per request; nothing is shared between requests

pub mod context;
pub mod envelope;
pub mod form;
pub mod handler;
pub mod mock;
pub mod service;

pub use context::{escape, Context, RequestContext, HANGUP};
pub use envelope::Envelope;
pub use form::FormValues;
pub use handler::HandlerFunc;
pub use mock::MockContext;
pub use service::service;
