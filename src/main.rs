use anyhow::Context;
use clap::Parser;
use dingles_backend::{
    adapters::database::mysql::MySqlDatabase,
    api,
    config::{Args, Config},
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_args(Args::parse()).context("failed to read configuration")?;

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url())
        .await
        .context("failed to connect to the store database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let app = api::router(Arc::new(MySqlDatabase::new(pool)));
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    tracing::info!(listen = %config.listen, "serving loyalty backend");
    axum::serve(listener, app).await?;

    Ok(())
}
