//! Offline fixture loader: fills the configured store with fake users and projects, then exits.

use portfolio_api::{connect, seed, telemetry, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env()?;
    let store = connect(&config.store).await?;
    let result = seed::run(store.as_ref(), &config.seed).await;
    store.close().await;
    let summary = result?;
    tracing::info!(users = summary.users, projects = summary.projects, "seeding finished");
    Ok(())
}
