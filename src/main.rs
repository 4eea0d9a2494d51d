use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenhouse_db::common::AppState;
use greenhouse_db::config::Config;
use greenhouse_db::ingest::Scheduler;
use greenhouse_db::routes;
use greenhouse_db::store::ReadingStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,greenhouse_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting greenhouse-db...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.api_host,
        port = config.api_port,
        interval_secs = config.measurement_interval_seconds,
        backfill = config.backfill_enabled,
        clear_enabled = config.clear_data_password.is_some(),
        "Configuration loaded"
    );

    // Open the database and ensure the schema (fail-fast)
    let store = ReadingStore::connect(
        &config.database_url,
        config.database_max_connections,
        Duration::from_secs(config.store_timeout_seconds),
    )
    .await?;
    store.init_schema().await?;
    tracing::info!(url = %config.database_url, "Database ready");

    // Spawn the measurement scheduler; it stops when `shutdown_tx` flips
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::from_config(store.clone(), &config);
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    let state = AppState::new(store, config.clone());
    let app = routes::build_router(state);

    // Start server with graceful shutdown
    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send_replace(true);
    match scheduler_task.await {
        Ok(ticks) => tracing::info!(ticks, "Scheduler joined"),
        Err(e) => tracing::error!(error = %e, "Scheduler task failed"),
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
