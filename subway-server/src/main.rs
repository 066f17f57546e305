use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subway_server::config::ServerConfig;
use subway_server::store::{Snapshot, Store};
use subway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Load the snapshot if one is configured (fail fast if it is unreadable)
    let store = match &config.snapshot_path {
        Some(path) => {
            info!(path = %path.display(), "using snapshot");
            Store::open(Snapshot::new(path))?
        }
        None => {
            info!("no snapshot configured, data lives in memory only");
            Store::in_memory()
        }
    };

    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "subway server listening");
    info!("  GET/POST        /stations");
    info!("  DELETE          /stations/:id");
    info!("  GET/POST        /lines");
    info!("  GET/PUT/DELETE  /lines/:id");
    info!("  POST            /lines/:id/sections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("subway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
