//! Hostel server entry point

use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result};
use hostel_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tracing::info;

use hostel_server::{
    api,
    config::Config,
    db,
    features::FeatureState,
    middleware,
    storage::{config::StorageConfig, Storage},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let (log_config, log_config_error) = match LogConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => {
            let fallback = LogConfig {
                log_file_prefix: "hostel-server".to_string(),
                filter_directives: Some("hostel_server=debug,tower_http=debug,sqlx=warn".to_string()),
                ..LogConfig::default()
            };
            (fallback, Some(e))
        },
    };
    let _log_guard = init_logging(&log_config)?;
    if let Some(e) = log_config_error {
        tracing::warn!(error = %e, "Invalid logging configuration, using defaults");
    }

    info!("Starting hostel server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database migrations completed");

    let storage = Storage::new(StorageConfig::from_env()?).await?;

    let state = FeatureState {
        db: pool,
        storage,
        upload_max_bytes: config.uploads.max_bytes,
    };
    let app = api::create_router(state, &config);
    let app = middleware::rate_limit::apply_rate_limit(app, &config.rate_limit);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
    .await?;

    info!("Server shut down gracefully");

    Ok(())
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
