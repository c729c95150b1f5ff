use std::{net::SocketAddr, sync::Arc};

use account_admin_server::{
    config::Config, create_app, database::Database, handlers::AppState,
    services::metrics::MetricsService,
};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let database = Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        database.migrate().await.context("failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let state = AppState {
        store: Arc::new(database),
        config: config.clone(),
        metrics: Arc::new(MetricsService::new()?),
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Account admin server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
