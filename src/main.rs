//! TwiML webhook server.
//!
//! Serves a handful of sample handlers:
//! - `/voice` greets the caller by number
//! - `/gather` asks for a digit and reads it back
//! - `/hangup` ends the call

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use twiml_handler::config::{load_config, validate_config, ConfigError, ServerConfig};
use twiml_handler::lifecycle::{wait_for_signal, Shutdown};
use twiml_handler::observability::{logging, metrics};
use twiml_handler::responsef;
use twiml_handler::twiml::{escape, Context};
use twiml_handler::{HttpServer, TwimlRouter};

#[derive(Parser)]
#[command(name = "twiml-server")]
#[command(about = "Serve TwiML webhook handlers over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_tracing(&config.observability.log_level)?;
    tracing::info!("twiml-server v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let mut routes = TwimlRouter::new();
    routes.handle("/voice", voice)?;
    routes.handle("/gather", gather)?;
    routes.handle("/hangup", |ctx| ctx.hangup())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for webhooks"
    );

    let server = HttpServer::new(config, routes)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn voice(ctx: &mut dyn Context) {
    let from = ctx.value("From");
    if from.is_empty() {
        ctx.response("<Say>Hello caller.</Say>");
    } else {
        responsef!(ctx, "<Say>Hello {}.</Say>", escape(&from));
    }
    ctx.response(r#"<Redirect method="POST">/gather</Redirect>"#);
}

fn gather(ctx: &mut dyn Context) {
    match ctx.try_int_value("Digits") {
        Some(digit) => {
            responsef!(ctx, "<Say>You pressed {}. Goodbye.</Say>", digit);
            ctx.hangup();
        }
        None => ctx.response(
            r#"<Gather numDigits="1" action="/gather" method="POST"><Say>Press any key.</Say></Gather>"#,
        ),
    }
}
