//! Catalog book model.

use serde::{Deserialize, Serialize};

use inkleaf_core::{BookId, Price};

/// A book in the store catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Unique book ID.
    pub id: BookId,
    /// Title, shown on receipts and notifications. Also the lookup key for
    /// direct purchases.
    pub name: String,
    /// Author, for display.
    pub author: String,
    /// Current unit price.
    pub price: Price,
    /// Units on hand. Only the inventory ledger writes this.
    pub quantity: u32,
}
