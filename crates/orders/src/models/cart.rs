//! Shopping cart model.

use serde::{Deserialize, Serialize};

use inkleaf_core::{BookId, CartId, UserId};

/// A cart holding a single book selection, ready for checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart ID. Doubles as the idempotency key for cart checkouts.
    pub id: CartId,
    /// Owner of the cart.
    pub user_id: UserId,
    /// Book selected for purchase.
    pub book_id: BookId,
    /// Requested number of units.
    pub book_quantity: u32,
}
