//! wildlife-api - HTTP server for the wildlife workbench.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wildlife_api::{router, AppConfig, AppState};
use wildlife_db::{ConnectionProvider, Database};
use wildlife_geocode::NominatimGeocoder;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "wildlife_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wildlife_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("wildlife-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = AppConfig::from_env();

    // Connect to database; a server that cannot reach it does not start
    info!("Connecting to database...");
    let provider = Arc::new(ConnectionProvider::new(
        config.database_url.clone(),
        config.pool.clone(),
    ));
    provider.get_connection().await?;
    info!("Database connected");

    let db = Database::lazy(provider, config.cache_ttl, config.cache_capacity);

    info!(
        url = %config.geocoder.base_url,
        enabled = config.geocoder.enabled,
        timeout_secs = config.geocoder.timeout_secs,
        "Geocoder configured"
    );
    let geocoder = Arc::new(NominatimGeocoder::new(config.geocoder.clone())?);

    let state = AppState::new(db.clone(), geocoder);
    let app = router(state, &config.allowed_origins);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}
