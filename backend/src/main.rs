//! Air Quality Monitor - Backend Server
//!
//! The protected barrier API in front of the air-quality database: ingestion
//! gateway for the city pollers, alert queries for the dispatcher, and
//! rollup/ranking queries for the citizen dashboard.

use axum::{routing::get, Router};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqm_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Air Quality Monitor Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("City: {}", config.city);

    // Create database connection pool. The database container may still be
    // starting; keep knocking before giving up.
    tracing::info!("Connecting to database...");
    let db_pool = connect_with_retry(&config.database).await?;
    tracing::info!("Database connection established");

    // The service owns its schema; migrations run on every start
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Migrations completed");

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect to Postgres, retrying while the database comes up.
async fn connect_with_retry(db: &config::DatabaseConfig) -> anyhow::Result<PgPool> {
    const ATTEMPTS: u32 = 10;

    for attempt in 1..=ATTEMPTS {
        match PgPoolOptions::new()
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&db.url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < ATTEMPTS => {
                tracing::warn!(
                    "Database not ready (attempt {}/{}): {}",
                    attempt,
                    ATTEMPTS,
                    e
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    unreachable!("retry loop returns on the last attempt")
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Air Quality Monitor API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
