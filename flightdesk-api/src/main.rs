use anyhow::Context;
use flightdesk_api::{app, AppState};
use flightdesk_core::InMemoryStore;
use flightdesk_store::app_config::{Config, StoreBackend};
use flightdesk_store::{DbClient, MetaWeatherClient, PostgresFlightStore, PostgresPassengerStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "flightdesk_api=debug,flightdesk_core=debug,flightdesk_store=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Flightdesk API on port {}", config.server.port);

    let weather = Arc::new(
        MetaWeatherClient::new(&config.weather).context("Failed to build weather client")?,
    );

    let (app_state, db) = match config.database.backend {
        StoreBackend::Postgres => {
            let db = DbClient::new(&config.database)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;

            let state = AppState::new(
                Arc::new(PostgresFlightStore::new(db.pool.clone())),
                Arc::new(PostgresPassengerStore::new(db.pool.clone())),
                weather,
            );
            (state, Some(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on shutdown");
            let store = Arc::new(InMemoryStore::new());
            (AppState::new(store.clone(), store, weather), None)
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(db) = db {
        db.close().await;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
