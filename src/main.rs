use healthvoice::{AppState, Config, FileStore, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let store = Arc::new(FileStore::open(&config.data_path));
    info!(path = %store.path().display(), "session store opened");
    let state = AppState::new(config.clone(), store);
    info!(
        api = %config.api_base_url,
        user_id = %state.session.user_id(),
        "dashboard views mounted"
    );

    match state.client.health().await {
        Ok(health) => info!(status = %health.status, "backend reachable"),
        Err(err) => warn!("backend health check failed: {err}"),
    }

    let poller = (!config.poll_interval.is_zero())
        .then(|| state.bus.spawn_periodic(config.poll_interval));

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = poller {
        poller.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
