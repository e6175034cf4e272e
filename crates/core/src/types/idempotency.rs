//! Idempotency keys for order placement.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::CartId;

/// Key that makes order placement idempotent.
///
/// Every placement carries exactly one key: cart checkouts reuse the cart id,
/// direct purchases supply a client-generated token. The order store enforces
/// that at most one active order exists per key, which is what turns a
/// double-submitted request into a duplicate error instead of a second order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdempotencyKey {
    /// Placement that checks out an existing cart.
    Cart(CartId),
    /// Direct placement keyed by a client-supplied token.
    Token(Uuid),
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cart(id) => write!(f, "cart:{id}"),
            Self::Token(token) => write!(f, "token:{token}"),
        }
    }
}
