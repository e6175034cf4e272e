//! HTTP route handlers for the order API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//!
//! # Orders (bearer auth)
//! POST   /api/orders            - Place an order
//! GET    /api/orders/:order_id  - Fetch one of the caller's orders
//! DELETE /api/orders/:order_id  - Cancel an order
//! ```

pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place))
        .route("/{order_id}", get(orders::show).delete(orders::cancel))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api/orders", order_routes())
}
