//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use twiml_handler::{HttpServer, ServerConfig, Shutdown, TwimlRouter};

/// Start the server on an ephemeral local port.
///
/// Returns the bound address and the shutdown handle keeping it alive.
pub async fn start_server(config: ServerConfig, routes: TwimlRouter) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, routes).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
