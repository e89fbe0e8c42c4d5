//! Server binary: reads config from the environment, connects the store, serves until Ctrl-C, then closes the store.

use portfolio_api::{app, connect, telemetry, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env()?;
    let store = connect(&config.store).await?;
    let state = AppState::new(store.clone(), config.user_delete_policy);
    let router = app(state, &config.server);

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        backend = ?config.store.backend,
        prefix = config.server.api_prefix.as_deref().unwrap_or("/"),
        delete_policy = ?config.user_delete_policy,
        "listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("store closed, bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
