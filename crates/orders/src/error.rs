//! Workflow error taxonomy.

use thiserror::Error;

use inkleaf_core::OrderIdError;

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Errors returned by order placement, cancellation, and lookup.
///
/// Each variant is one customer-visible failure; the API layer owns the
/// mapping to HTTP statuses.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The acting user does not exist or has not verified their email.
    #[error("user not found or not verified")]
    UserNotFound,

    /// An active order already exists for the placement's idempotency key.
    #[error("an order was already placed for this cart or token")]
    OrderAlreadyExists,

    /// The cart does not exist or belongs to another user.
    #[error("cart not found")]
    CartNotFound,

    /// The book is not in the catalog.
    #[error("book not found")]
    BookNotFound,

    /// Not enough stock to cover the requested quantity.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units the placement asked for.
        requested: u32,
        /// Units on hand at decision time.
        available: u32,
    },

    /// The address does not exist or belongs to another user.
    #[error("address not found")]
    AddressNotFound,

    /// Direct placements must request at least one unit.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The supplied order id is not a well-formed order token.
    #[error("invalid order id: {0}")]
    InvalidOrderId(#[from] OrderIdError),

    /// No order with this id exists for the acting user.
    #[error("order not found")]
    OrderNotFound,

    /// Concurrent activity on the same book exhausted the retry budget.
    #[error("the store is busy, try again")]
    Contended,

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LedgerError> for OrderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownBook(_) => Self::BookNotFound,
            LedgerError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            LedgerError::Contended(_) => Self::Contended,
            LedgerError::Store(err) => Self::Store(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use inkleaf_core::BookId;

    use super::*;

    #[test]
    fn test_ledger_insufficient_stock_keeps_counts() {
        let err = OrderError::from(LedgerError::InsufficientStock {
            requested: 11,
            available: 10,
        });

        assert!(matches!(
            err,
            OrderError::InsufficientStock {
                requested: 11,
                available: 10
            }
        ));
    }

    #[test]
    fn test_ledger_unknown_book_is_book_not_found() {
        let err = OrderError::from(LedgerError::UnknownBook(BookId::new(7)));
        assert!(matches!(err, OrderError::BookNotFound));
    }

    #[test]
    fn test_ledger_contention_is_contended() {
        let err = OrderError::from(LedgerError::Contended(BookId::new(7)));
        assert!(matches!(err, OrderError::Contended));
    }
}
