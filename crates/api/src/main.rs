//! Postboard server entry point

use std::sync::Arc;

use anyhow::Context;
use postboard_api::{
    config::{LogFormat, StoreBackend},
    routes::create_router,
    AppState, Config,
};
use postboard_shared::{
    check_connection, create_pool, run_migrations, MemoryPostStore, PgPostStore, PostStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("load configuration")?;
    init_tracing(config.log_format);

    let store = connect_store(&config).await?;
    let bind_address = config.bind_address.clone();
    let state = AppState::new(store, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("bind {bind_address}"))?;
    tracing::info!(address = %bind_address, "Postboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,postboard_api=debug,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Build the post store. A database that is down at startup is logged and
/// the server starts anyway; there is no retry.
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn PostStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory post store; posts are lost on restart");
            let store: Arc<dyn PostStore> = Arc::new(MemoryPostStore::new());
            Ok(store)
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let pool = create_pool(url, config.database_max_connections)
                .context("parse DATABASE_URL")?;

            match check_connection(&pool).await {
                Ok(()) => {
                    tracing::info!("Connected to database");
                    match run_migrations(&pool).await {
                        Ok(()) => tracing::info!("Database migrations applied"),
                        Err(e) => tracing::error!(error = %e, "Failed to run database migrations"),
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to connect to database; serving without it");
                }
            }

            let store: Arc<dyn PostStore> = Arc::new(PgPostStore::new(pool));
            Ok(store)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
