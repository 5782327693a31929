use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use storage::{Database, repository::session::SessionRepository};

mod config;
mod error;
mod features;
mod middleware;
mod openapi;
mod realtime;
mod routes;
mod state;

use config::Config;
use features::shop::gateway::ManualGateway;
use middleware::auth::ApiKeys;
use realtime::RealtimeHub;
use state::{AppState, SessionSettings};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Drops expired sessions once an hour.
fn spawn_session_purge(db: Database) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match SessionRepository::new(db.pool()).purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Pitchside API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    spawn_session_purge(db.clone());

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API_KEYS configured, admin endpoints will reject every request");
    } else {
        tracing::info!(keys = api_keys.len(), "Admin API keys loaded");
    }

    let state = AppState {
        db,
        hub: RealtimeHub::new(),
        api_keys,
        sessions: SessionSettings {
            ttl_hours: config.session_ttl_hours,
        },
        payments: Arc::new(ManualGateway),
    };
    tracing::info!(gateway = state.payments.name(), "Payment gateway ready");

    let app = routes::router(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
