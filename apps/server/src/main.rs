//! Brioche POS - HTTP API Server
//!
//! Thin orchestration in front of the engines: parses and validates
//! requests, gates by role, maps errors to status codes. Business logic
//! lives in brioche-core and brioche-db; payment provider access is behind
//! the injected gateway trait.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brioche_db::{Database, DbConfig};
use brioche_gateway::{HostedCheckoutClient, PaymentGateway};

mod auth;
mod config;
mod error;
mod handlers;
mod routes;

pub use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// Injected at startup; tests substitute a canned implementation.
    pub gateway: Arc<dyn PaymentGateway>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brioche_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Brioche POS server");

    // Database (runs migrations on connect)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    // Payment gateway client, constructed once and injected
    let gateway =
        HostedCheckoutClient::new(&config.gateway_base_url, &config.gateway_server_key)?;

    let addr = SocketAddr::new(config.host.parse()?, config.port);

    let state = AppState {
        db,
        config: Arc::new(config),
        gateway: Arc::new(gateway),
    };

    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware.
fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
