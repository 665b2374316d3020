//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, service wiring and the
//! Axum server lifecycle.

use crate::application::services::{KeyGenerator, LinkSettings};
use crate::config::{Config, StorageBackend};
use crate::domain::clock::SystemClock;
use crate::domain::repositories::{ShortLinkRepository, UserRepository};
use crate::domain::url_validator::UrlValidator;
use crate::infrastructure::memory::{MemoryShortLinkRepository, MemoryUserRepository};
use crate::infrastructure::persistence::{PgShortLinkRepository, PgUserRepository};
use crate::infrastructure::reachability::HttpUrlValidator;
use crate::routes::app_router;
use crate::state::{AppState, StateDeps};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

type Repositories = (Arc<dyn ShortLinkRepository>, Arc<dyn UserRepository>);

/// Opens a PostgreSQL pool sized by the `DB_*` settings.
///
/// # Errors
///
/// Returns an error if no database is configured or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the repositories for the configured backend.
///
/// The PostgreSQL backend applies pending migrations before returning.
async fn open_repositories(config: &Config) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            let links: Arc<dyn ShortLinkRepository> =
                Arc::new(PgShortLinkRepository::new(pool.clone()));
            let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
            Ok((links, users))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            let links: Arc<dyn ShortLinkRepository> = Arc::new(MemoryShortLinkRepository::new());
            let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
            Ok((links, users))
        }
    }
}

/// Assembles the application state from configuration.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the OS random source is
/// unavailable.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let (link_repository, user_repository) = open_repositories(config).await?;

    let url_validator = config.validate_original_url.then(|| {
        Arc::new(HttpUrlValidator::new(Duration::from_secs(
            config.url_check_timeout_seconds,
        ))) as Arc<dyn UrlValidator>
    });

    let key_generator = Arc::new(KeyGenerator::from_os_rng()?);

    let settings = LinkSettings {
        default_expiry_days: config.default_expiry_days,
        key_insert_attempts: config.key_insert_attempts,
        base_url: config.base_url.clone(),
    };

    Ok(AppState::new(
        StateDeps {
            link_repository,
            user_repository,
            key_generator,
            clock: Arc::new(SystemClock),
            url_validator,
        },
        settings,
        config.default_page_size,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL pool with migrations, or in-memory)
/// - Link service and redirect resolver
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
