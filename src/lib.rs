//! Helpers for serving TwiML from HTTP handlers.
//!
//! A handler is a plain function over a [`twiml::Context`]: it reads the
//! webhook's form values and appends TwiML fragments. The library wraps the
//! output in the `<Response>` envelope and writes it in one piece.
//!
//! ```no_run
//! use twiml_handler::{responsef, HttpServer, ServerConfig, Shutdown, TwimlRouter};
//! use twiml_handler::twiml::Context;
//!
//! fn voice(ctx: &mut dyn Context) {
//!     let from = ctx.value("From");
//!     responsef!(ctx, "<Say>Hello {}</Say>", twiml_handler::twiml::escape(&from));
//!     ctx.hangup();
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut routes = TwimlRouter::new();
//! routes.handle("/voice", voice)?;
//!
//! let server = HttpServer::new(ServerConfig::default(), routes)?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! let shutdown = Shutdown::new();
//! server.run(listener, shutdown.subscribe()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod twiml;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::TwimlRouter;
