//! Inventory ledger: the only writer of book stock.

use std::sync::Arc;

use thiserror::Error;
use tracing::{instrument, warn};

use inkleaf_core::BookId;

use crate::config::LockConfig;
use crate::locks::KeyedLocks;
use crate::models::Book;
use crate::store::{CatalogStore, StoreError};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The book is not in the catalog.
    #[error("book {0} is not in the catalog")]
    UnknownBook(BookId),

    /// Reservation asked for more units than are on hand.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested.
        requested: u32,
        /// Units on hand.
        available: u32,
    },

    /// The per-book lock stayed contended through every retry.
    #[error("inventory lock for book {0} is contended")]
    Contended(BookId),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Exclusive access to one book's stock.
///
/// Obtained from [`InventoryLedger::guard`]; holding it serializes every
/// reserve and release for that book. Dropping it frees the book for the
/// next caller.
#[derive(Debug)]
pub struct StockGuard {
    book_id: BookId,
    _permit: tokio::sync::OwnedMutexGuard<()>,
}

impl StockGuard {
    /// The book this guard covers.
    #[must_use]
    pub const fn book_id(&self) -> BookId {
        self.book_id
    }
}

/// The single authority over stock movements.
///
/// Every quantity change goes through [`reserve`](Self::reserve) or
/// [`release`](Self::release), and both demand a [`StockGuard`], so a
/// check-then-write can never interleave with another writer on the same
/// book. The ledger maintains one invariant: stock never goes negative.
pub struct InventoryLedger {
    catalog: Arc<dyn CatalogStore>,
    locks: KeyedLocks<BookId>,
}

impl InventoryLedger {
    /// Create a ledger over the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogStore>, lock: LockConfig) -> Self {
        Self {
            catalog,
            locks: KeyedLocks::new(lock),
        }
    }

    /// Take exclusive access to one book's stock.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Contended`] when the lock cannot be acquired
    /// within the configured retry budget.
    pub async fn guard(&self, book_id: BookId) -> Result<StockGuard, LedgerError> {
        let permit = self
            .locks
            .acquire(&book_id)
            .await
            .map_err(|_| LedgerError::Contended(book_id))?;

        Ok(StockGuard {
            book_id,
            _permit: permit,
        })
    }

    /// Verify and deduct stock for a purchase, in one step.
    ///
    /// Returns the book with its post-reservation quantity; the returned row
    /// also carries the authoritative title and price for receipts.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientStock`], without changing
    /// anything, when fewer than `amount` units are on hand.
    #[instrument(skip(self, guard), fields(book_id = %guard.book_id()))]
    pub async fn reserve(&self, guard: &StockGuard, amount: u32) -> Result<Book, LedgerError> {
        let mut book = self.book(guard.book_id).await?;

        if amount > book.quantity {
            return Err(LedgerError::InsufficientStock {
                requested: amount,
                available: book.quantity,
            });
        }

        book.quantity -= amount;
        self.persist(&book).await?;
        Ok(book)
    }

    /// Return previously reserved stock, e.g. after a cancellation.
    ///
    /// The on-hand count clamps at `u32::MAX`; an overflowing release is
    /// logged rather than wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownBook`] if the book has vanished from
    /// the catalog.
    #[instrument(skip(self, guard), fields(book_id = %guard.book_id()))]
    pub async fn release(&self, guard: &StockGuard, amount: u32) -> Result<Book, LedgerError> {
        let mut book = self.book(guard.book_id).await?;

        book.quantity = match book.quantity.checked_add(amount) {
            Some(total) => total,
            None => {
                warn!(on_hand = book.quantity, amount, "stock release overflowed, clamping");
                u32::MAX
            }
        };
        self.persist(&book).await?;
        Ok(book)
    }

    async fn book(&self, book_id: BookId) -> Result<Book, LedgerError> {
        self.catalog
            .find_by_id(book_id)
            .await?
            .ok_or(LedgerError::UnknownBook(book_id))
    }

    async fn persist(&self, book: &Book) -> Result<(), LedgerError> {
        if self.catalog.update_quantity(book.id, book.quantity).await? {
            Ok(())
        } else {
            Err(LedgerError::UnknownBook(book.id))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use inkleaf_core::Price;

    use crate::store::MemoryCatalog;

    use super::*;

    fn sample_book(quantity: u32) -> Book {
        Book {
            id: BookId::new(1),
            name: "The Dispossessed".to_owned(),
            author: "Ursula K. Le Guin".to_owned(),
            price: Price::from_cents(2000),
            quantity,
        }
    }

    async fn ledger_with_stock(quantity: u32) -> (InventoryLedger, Arc<MemoryCatalog>) {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.insert(sample_book(quantity)).await;
        let ledger = InventoryLedger::new(catalog.clone(), LockConfig::default());
        (ledger, catalog)
    }

    #[tokio::test]
    async fn test_reserve_deducts_stock() {
        let (ledger, catalog) = ledger_with_stock(10).await;
        let guard = ledger.guard(BookId::new(1)).await.unwrap();

        let book = ledger.reserve(&guard, 3).await.unwrap();

        assert_eq!(book.quantity, 7);
        assert_eq!(catalog.quantity_of(BookId::new(1)).await, Some(7));
    }

    #[tokio::test]
    async fn test_reserve_takes_exact_stock() {
        let (ledger, catalog) = ledger_with_stock(10).await;
        let guard = ledger.guard(BookId::new(1)).await.unwrap();

        let book = ledger.reserve(&guard, 10).await.unwrap();

        assert_eq!(book.quantity, 0);
        assert_eq!(catalog.quantity_of(BookId::new(1)).await, Some(0));
    }

    #[tokio::test]
    async fn test_reserve_insufficient_changes_nothing() {
        let (ledger, catalog) = ledger_with_stock(10).await;
        let guard = ledger.guard(BookId::new(1)).await.unwrap();

        let err = ledger.reserve(&guard, 11).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                requested: 11,
                available: 10
            }
        ));
        assert_eq!(catalog.quantity_of(BookId::new(1)).await, Some(10));
    }

    #[tokio::test]
    async fn test_release_restores_stock() {
        let (ledger, catalog) = ledger_with_stock(10).await;
        let guard = ledger.guard(BookId::new(1)).await.unwrap();

        ledger.reserve(&guard, 3).await.unwrap();
        let book = ledger.release(&guard, 3).await.unwrap();

        assert_eq!(book.quantity, 10);
        assert_eq!(catalog.quantity_of(BookId::new(1)).await, Some(10));
    }

    #[tokio::test]
    async fn test_release_clamps_at_max() {
        let (ledger, _catalog) = ledger_with_stock(u32::MAX - 1).await;
        let guard = ledger.guard(BookId::new(1)).await.unwrap();

        let book = ledger.release(&guard, 5).await.unwrap();

        assert_eq!(book.quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_reserve_unknown_book() {
        let (ledger, _catalog) = ledger_with_stock(10).await;
        let guard = ledger.guard(BookId::new(99)).await.unwrap();

        let err = ledger.reserve(&guard, 1).await.unwrap_err();

        assert!(matches!(err, LedgerError::UnknownBook(id) if id == BookId::new(99)));
    }

    #[tokio::test]
    async fn test_guard_contended() {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.insert(sample_book(10)).await;
        let ledger = InventoryLedger::new(
            catalog.clone(),
            LockConfig {
                acquire_timeout: Duration::from_millis(10),
                max_attempts: 2,
            },
        );

        let _held = ledger.guard(BookId::new(1)).await.unwrap();
        let err = ledger.guard(BookId::new(1)).await.unwrap_err();

        assert!(matches!(err, LedgerError::Contended(id) if id == BookId::new(1)));
    }
}
