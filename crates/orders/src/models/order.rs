//! Placed order model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use inkleaf_core::{AddressId, BookId, IdempotencyKey, OrderId, Price, UserId};

/// A placed order.
///
/// Immutable once created; cancellation removes the order rather than
/// flipping a status flag, and the removal frees the idempotency key for
/// reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Customer-facing order id.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Book that was purchased.
    pub book_id: BookId,
    /// Shipping address chosen at placement.
    pub address_id: AddressId,
    /// Key the placement was deduplicated on.
    pub idempotency_key: IdempotencyKey,
    /// Units purchased.
    pub quantity: u32,
    /// Unit price at the time of placement.
    pub unit_price: Price,
    /// `unit_price * quantity`, captured at placement.
    pub total_price: Decimal,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
