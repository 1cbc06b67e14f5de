//! Documentation of the restaurant analytics dashboard backend.
//!
//! Serves summary metrics and chart series over orders, restaurants, reviews and dishes of a
//! restaurant-ordering platform. Rendering is left entirely to the client.
//!
//!
//!
//! # General Infrastructure
//! - MongoDB holds the platform data, this service only reads it
//! - Every collection is pulled whole and memoized for the cache TTL (10 minutes by default)
//! - Each request filters the cached snapshot and recomputes the aggregations, which is cheap at this data size
//! - Reviews and dishes are reported unfiltered, the filters only narrow orders
//!
//!
//!
//! # API
//!
//! Health check.
//! ```sh
//! curl localhost:8080/health
//! ```
//!
//! Values available for each filter.
//! ```sh
//! curl localhost:8080/filters
//! ```
//!
//! Full dashboard. Every parameter is optional, lists are comma-separated and `Todos` means no restriction.
//! ```sh
//! curl "localhost:8080/dashboard?categories=pizza,japonesa&start=2024-01-01&end=2024-06-30&statuses=entregue&top=5"
//! ```
//!
//! Each dashboard section carries a `status` of `ready`, `info` or `warning`. Only `ready` sections have `data`,
//! the others carry a `message` to show instead of the chart.
//!
//!
//!
//! # Notes
//!
//! ## Filters
//! Category, date, restaurant and status selections are independent predicates over orders, so the order in which
//! they are applied does not matter. A category selection that matches no restaurant is ignored, while a restaurant
//! selection that matches nothing yields no orders.
//!
//! ## Cache
//! There is no invalidation. New data shows up once the TTL has passed. Concurrent misses may fetch twice,
//! which is acceptable for a read-only snapshot.
//!
//!
//!
//! # Setup
//!
//! Connection string, read from `/run/secrets/MONGODB_URI` or the environment.
//! ```sh
//! export MONGODB_URI="mongodb://localhost:27017"
//! ```
//!
//! Optional settings.
//! ```sh
//! export RUST_PORT=8080
//! export DATABASE_NAME=restaurante_reviews_db
//! export CACHE_TTL_SECS=600
//! export RUST_LOG=info
//! ```
//!
//! Run the server.
//! ```sh
//! cargo run -p dashboard-server
//! ```
//!
//! Print a report without the server.
//! ```sh
//! cargo run -p process -- --statuses entregue --format text
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod analytics;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod filters;
pub mod report;
pub mod routes;
pub mod state;

use error::ServerError;
use routes::{dashboard_handler, filters_handler, health_handler};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/filters", get(filters_handler))
        .route("/dashboard", get(dashboard_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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
}
