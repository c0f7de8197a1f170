pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query;
pub mod resolver;
pub mod server;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::info;

use config::ServerConfig;
use server::{build_router, AppState};

/// Handle returned when the server is started programmatically.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
}

impl ServerHandle {
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
    }
}

/// Binds the configured address and serves in a background task, returning
/// a handle carrying the actual bound address. Used by the integration
/// tests to run against an ephemeral port.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<ServerHandle> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("invalid bind address")?;
    let router = build_router(AppState::new(config))?;

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    let actual_addr = listener
        .local_addr()
        .context("failed to read socket address")?;
    info!(%actual_addr, "starting timeline-mock");

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await
            .ok();
    });

    Ok(ServerHandle {
        addr: actual_addr,
        shutdown: tx,
    })
}
