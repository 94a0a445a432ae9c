//! event-booking-gateway server entry point.
//!
//! Connects to storage once, then serves GraphQL over HTTP and WebSocket.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use event_booking_gateway::api;
use event_booking_gateway::app_state::AppState;
use event_booking_gateway::config::{GatewayConfig, LogFormat, StorageBackend};
use event_booking_gateway::domain::EventBus;
use event_booking_gateway::persistence::{MemoryStore, MongoStore, Store};
use event_booking_gateway::service::{BookingService, PasswordHasher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, backend = ?config.storage_backend, "starting event-booking-gateway");

    // Connect storage; fail fast
    let store: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Mongo => Arc::new(
            MongoStore::connect(&config.mongo_uri, &config.mongo_database)
                .await
                .context("connecting to mongodb")?,
        ),
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Build service layer
    let hasher = PasswordHasher::new(config.bcrypt_cost).context("BCRYPT_COST")?;
    let event_bus = EventBus::new(config.event_bus_capacity);
    let booking_service = Arc::new(BookingService::new(store, hasher, event_bus));

    // Build application
    let app_state = AppState::new(booking_service, config.graphql_depth_limit);
    let app = api::build_app(
        app_state,
        Duration::from_secs(config.request_timeout_secs),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
