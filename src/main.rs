use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use timeline_mock::config::ServerConfig;
use timeline_mock::logging;
use timeline_mock::server::{build_router, AppState};

/// Mock timeline history server backed by static JSON files.
#[derive(Parser)]
#[command(name = "timeline-mock")]
#[command(about = "Serves paginated, filtered timeline entity queries from a local data directory", long_about = None)]
struct Cli {
    /// Origin of the UI allowed to query this server (CORS allow-origin)
    #[arg(default_value = "http://localhost:9001")]
    ui_origin: String,
    /// Port to listen on
    #[arg(default_value_t = 8188)]
    port: u16,
    /// Directory holding the JSON documents to serve
    #[arg(long, default_value = "data")]
    data_root: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init_tracing(None) {
        eprintln!("failed to initialise tracing: {err}");
    }

    let config = ServerConfig {
        ui_origin: cli.ui_origin,
        port: cli.port,
        data_root: cli.data_root,
    };
    let ui_origin = config.ui_origin.clone();

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
    info!(%actual_addr, %ui_origin, "timeline-mock running, use CTRL+C to shut down");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
