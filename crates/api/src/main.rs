//! Inkleaf API - order placement and cancellation service.
//!
//! This binary serves the JSON order API.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Order workflow from `inkleaf-orders` with per-book stock locking
//! - In-memory stores, optionally seeded with demo data
//! - Bearer-token authentication from `INKLEAF_API_KEYS`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkleaf_api::auth::StaticTokens;
use inkleaf_api::config::ApiConfig;
use inkleaf_api::routes;
use inkleaf_api::seed;
use inkleaf_api::state::AppState;
use inkleaf_orders::store::MemoryStores;
use inkleaf_orders::{LogNotifier, OrderWorkflow};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "inkleaf_api=info,inkleaf_orders=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    if config.api_keys.is_empty() {
        tracing::warn!("INKLEAF_API_KEYS is empty; every request will be rejected with 401");
    }

    // Build the stores and the order workflow
    let stores = MemoryStores::new();
    if config.demo_seed {
        seed::demo(&stores).await;
    }

    let notifier = Arc::new(LogNotifier);
    let workflow = OrderWorkflow::new(stores.handles(), notifier, config.workflow_config());

    // Build application state
    let identity = Arc::new(StaticTokens::from_keys(&config.api_keys));
    let state = AppState::new(workflow, identity);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// The in-memory stores have no external dependencies to check, so
/// readiness collapses to liveness.
async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
