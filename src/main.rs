use std::sync::Arc;

use anyhow::Context;
use operations_hub::{
    config::Config,
    repositories::{InMemoryOperationRepository, OperationRepository, SeaOrmOperationRepository},
    routes::build_router,
    services::session::SessionStore,
    AppState,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,operations_hub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;

    let repository: Arc<dyn OperationRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(database_url.as_str())
                .await
                .context("Failed to connect to database")?;

            if config.run_migrations {
                tracing::info!("Running migrations...");
                migration::Migrator::up(&db, None)
                    .await
                    .context("Failed to run migrations")?;
            }

            Arc::new(SeaOrmOperationRepository::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, operations are kept in memory only");
            Arc::new(InMemoryOperationRepository::new())
        }
    };

    let sessions = SessionStore::new(config.credentials.clone(), config.require_auth);
    if sessions.is_required() {
        tracing::info!("Session required on /operacoes");
    }

    let app = build_router(AppState::new(repository, sessions));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
