//! arena-booking server entry point.
//!
//! Loads configuration, selects the booking store, and starts the Axum
//! HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use arena_booking::api;
use arena_booking::api::auth::JwtKeys;
use arena_booking::app_state::AppState;
use arena_booking::config::{AppConfig, LogFormat};
use arena_booking::domain::VenueClock;
use arena_booking::persistence::{BookingStore, InMemoryBookingStore, PostgresBookingStore};
use arena_booking::service::BookingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        addr = %config.listen_addr,
        timezone = %config.venue_timezone,
        "starting arena-booking"
    );
    if config.jwt_secret_is_default {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    // Build persistence layer
    let store = build_store(&config).await?;

    // Build service layer
    let booking_service = BookingService::new(store, VenueClock::new(config.venue_timezone));

    // Build application state
    let app_state = AppState::new(booking_service, JwtKeys::new(&config.jwt_secret));

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BookingStore>> {
    if config.persistence_enabled {
        let store = PostgresBookingStore::connect(config)
            .await
            .context("failed to connect to PostgreSQL")?;
        store.migrate().await.context("failed to run migrations")?;
        tracing::info!("using PostgreSQL booking store");
        return Ok(Arc::new(store));
    }

    let store = match &config.catalog_seed_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read catalog seed {}", path.display()))?;
            InMemoryBookingStore::from_catalog_json(&json)
                .with_context(|| format!("invalid catalog seed {}", path.display()))?
        }
        None => InMemoryBookingStore::new(),
    };
    tracing::warn!("persistence disabled, reservations are kept in memory");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
