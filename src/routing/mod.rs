//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     TwimlRouter::handle(path, handler)
//!     → validate path
//!     → register on Axum Router (any method)
//!     → handed to HttpServer, immutable from then on
//!
//! Request:
//!     Axum matches path → TwiML service → handler
//! ```

pub mod router;

pub use router::{RouteError, TwimlRouter};
