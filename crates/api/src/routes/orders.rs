//! Order API routes.
//!
//! JSON endpoints for placing, fetching, and cancelling orders. Every
//! handler authenticates through [`CurrentUser`] and delegates to the order
//! workflow; failures map onto status codes in [`crate::error`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkleaf_core::{AddressId, BookId, CartId, OrderId, Price};
use inkleaf_orders::models::Order;
use inkleaf_orders::{CancellationReceipt, OrderReceipt, Placement};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Placement
// ============================================================================

/// Request body for placing an order.
///
/// Cart checkout and direct purchase share the endpoint. A body carrying a
/// `cart_id` is treated as a cart checkout even if direct-purchase fields
/// are also present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PlaceOrderBody {
    /// Check out an existing cart.
    Cart {
        /// Cart to check out; book and quantity come from the cart.
        cart_id: CartId,
        /// Shipping address for the order.
        address_id: AddressId,
    },
    /// Buy a book directly by title.
    Direct {
        /// Exact catalog title.
        book_name: String,
        /// Units to buy.
        quantity: u32,
        /// Client-generated idempotency token.
        idempotency_token: Uuid,
        /// Shipping address for the order.
        address_id: AddressId,
    },
}

impl PlaceOrderBody {
    fn into_parts(self) -> (Placement, AddressId) {
        match self {
            Self::Cart {
                cart_id,
                address_id,
            } => (Placement::FromCart { cart_id }, address_id),
            Self::Direct {
                book_name,
                quantity,
                idempotency_token,
                address_id,
            } => (
                Placement::Direct {
                    book_name,
                    quantity,
                    token: idempotency_token,
                },
                address_id,
            ),
        }
    }
}

/// Response from placing an order.
#[derive(Debug, Serialize)]
pub struct PlacedResponse {
    pub message: String,
    #[serde(flatten)]
    pub receipt: OrderReceipt,
}

/// Place an order.
///
/// POST /api/orders
///
/// Returns 201 with the receipt on success.
///
/// # Errors
///
/// Returns `ApiError` mapping the workflow failure onto a status code.
pub async fn place(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<PlacedResponse>), ApiError> {
    let (placement, address_id) = body.into_parts();
    let receipt = state
        .workflow()
        .place_order(user_id, placement, address_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlacedResponse {
            message: "order placed".to_string(),
            receipt,
        }),
    ))
}

// ============================================================================
// Cancellation
// ============================================================================

/// Response from cancelling an order.
#[derive(Debug, Serialize)]
pub struct CancelledResponse {
    pub message: String,
    #[serde(flatten)]
    pub receipt: CancellationReceipt,
}

/// Cancel an order and return its stock.
///
/// DELETE /api/orders/:order_id
///
/// # Errors
///
/// Returns `ApiError` mapping the workflow failure onto a status code.
pub async fn cancel(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<CancelledResponse>, ApiError> {
    let receipt = state.workflow().cancel_order(user_id, &order_id).await?;

    Ok(Json(CancelledResponse {
        message: "order cancelled".to_string(),
        receipt,
    }))
}

// ============================================================================
// Lookup
// ============================================================================

/// One of the caller's orders, as returned by the API.
///
/// The caller's own user id and the internal idempotency key are omitted.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order_id: OrderId,
    pub book_id: BookId,
    pub address_id: AddressId,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            book_id: order.book_id,
            address_id: order.address_id,
            quantity: order.quantity,
            unit_price: order.unit_price,
            total_price: order.total_price,
            created_at: order.created_at,
        }
    }
}

/// Fetch one of the caller's orders.
///
/// GET /api/orders/:order_id
///
/// # Errors
///
/// Returns `ApiError` mapping the workflow failure onto a status code;
/// unknown ids and other users' orders both surface as 404.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state.workflow().find_order(user_id, &order_id).await?;
    Ok(Json(OrderView::from(order)))
}
