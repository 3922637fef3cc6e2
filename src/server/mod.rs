mod config;
mod dispatch;
mod routes;

pub use config::ServerConfig;
pub use dispatch::Dispatcher;
pub use routes::{parse_query_string, router};

use crate::error::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn serve(config: ServerConfig, dispatcher: Dispatcher) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, url_path = %config.url_path(), "Serving queries");

    axum::serve(listener, router(&config, Arc::new(dispatcher)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
