//! `swarmd serve` — the REST API server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use swarmgrid_registry::SwarmRegistry;

/// Serve the registry API on `listen` until Ctrl-C.
pub async fn run(registry: Arc<SwarmRegistry>, listen: &str) -> anyhow::Result<()> {
    info!("SwarmGrid daemon starting");

    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address {listen}"))?;
    let router = swarmgrid_api::build_router(registry);

    info!(%addr, "API server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("SwarmGrid daemon stopped");
    Ok(())
}
