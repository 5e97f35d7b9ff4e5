//! Crewdesk messaging gateway binary.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 0.0.0.0:4000, WebSocket on /ws
//! crewdesk
//!
//! # Override through the environment (or a .env file)
//! CREWDESK__SERVER__PORT=8080 CREWDESK__MESSAGING__WS_PATH=/chat crewdesk
//! ```

use std::sync::Arc;

use crewdesk::adapters::{create_router, InMemoryConnectionRegistry};
use crewdesk::application::{GatewayConfig, SessionGateway};
use crewdesk::config::AppConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
    }

    config.validate()?;
    let addr = config.server.socket_addr()?;

    tracing::info!(
        environment = ?config.server.environment,
        ws_path = %config.messaging.ws_path,
        "Crewdesk gateway starting"
    );

    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let gateway = Arc::new(SessionGateway::with_config(
        registry,
        GatewayConfig {
            max_text_chars: config.messaging.max_text_chars,
        },
    ));
    let app = create_router(Arc::clone(&gateway), &config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        open_connections = gateway.open_connections().await,
        "Crewdesk gateway stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
