//! Persistence traits for the order workflow.
//!
//! The workflow talks to storage through these traits so the same code runs
//! against the bundled in-memory stores and against a database-backed
//! implementation later. Lookups return `Ok(None)` for missing rows;
//! [`StoreError`] is reserved for backend failures.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use inkleaf_core::{AddressId, BookId, CartId, IdempotencyKey, OrderId, UserId};

use crate::models::{Address, Book, Cart, Order, User};

pub use memory::{
    MemoryAddresses, MemoryCarts, MemoryCatalog, MemoryOrders, MemoryStores, MemoryUsers,
};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Constraint violation (e.g. duplicate order id).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend failed or is unreachable.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Errors that can occur when inserting an order.
///
/// Split from [`StoreError`] so the workflow can tell "this key already has
/// an order" apart from "this random id collided".
#[derive(Debug, Error)]
pub enum InsertOrderError {
    /// An active order already exists for this idempotency key.
    #[error("an order already exists for this idempotency key")]
    DuplicateKey,

    /// The generated order id is already taken.
    #[error("order id already taken")]
    DuplicateId,

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read access to customer accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by id.
    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Read access to shopping carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Look up a cart by id, scoped to its owner.
    async fn find_for_user(
        &self,
        id: CartId,
        user_id: UserId,
    ) -> Result<Option<Cart>, StoreError>;
}

/// Read access to shipping addresses.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Look up an address by id, scoped to its owner.
    async fn find_for_user(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, StoreError>;
}

/// Catalog lookups plus the single quantity write the inventory ledger needs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a book by id.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Look up a book by exact title.
    async fn find_by_name(&self, name: &str) -> Result<Option<Book>, StoreError>;

    /// Persist a new on-hand quantity. Returns `false` if the book is
    /// unknown.
    async fn update_quantity(&self, id: BookId, quantity: u32) -> Result<bool, StoreError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order.
    ///
    /// Implementations must enforce, atomically, that both the order id and
    /// the idempotency key are unused.
    async fn insert(&self, order: Order) -> Result<(), InsertOrderError>;

    /// Look up an order by id, scoped to its owner.
    async fn find_for_user(
        &self,
        id: &OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError>;

    /// Look up the active order for an idempotency key, if any.
    async fn find_by_key(&self, key: &IdempotencyKey) -> Result<Option<Order>, StoreError>;

    /// Remove an order by id, scoped to its owner, returning the removed
    /// row. Exactly one of several concurrent removals gets the row; the
    /// rest see `None`.
    async fn remove(&self, id: &OrderId, user_id: UserId) -> Result<Option<Order>, StoreError>;
}

/// Bundle of store handles the workflow is wired with.
///
/// For tests and single-process deployments, [`MemoryStores`] builds the
/// in-memory version and hands out this bundle via
/// [`handles`](MemoryStores::handles).
#[derive(Clone)]
pub struct Stores {
    /// Customer accounts.
    pub users: Arc<dyn UserDirectory>,
    /// Shopping carts.
    pub carts: Arc<dyn CartStore>,
    /// Shipping addresses.
    pub addresses: Arc<dyn AddressStore>,
    /// Book catalog.
    pub catalog: Arc<dyn CatalogStore>,
    /// Placed orders.
    pub orders: Arc<dyn OrderStore>,
}
