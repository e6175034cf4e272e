//! In-memory store implementations.
//!
//! Backed by `tokio::sync::RwLock`ed maps. Suitable for tests and
//! single-process deployments; a database-backed implementation slots in
//! behind the same traits when durability matters.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkleaf_core::{AddressId, BookId, CartId, IdempotencyKey, OrderId, UserId};

use crate::models::{Address, Book, Cart, Order, User};

use super::{
    AddressStore, CartStore, CatalogStore, InsertOrderError, OrderStore, StoreError, Stores,
    UserDirectory,
};

// =============================================================================
// MemoryUsers
// =============================================================================

/// In-memory [`UserDirectory`].
#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUsers {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

// =============================================================================
// MemoryCarts
// =============================================================================

/// In-memory [`CartStore`].
#[derive(Debug, Default)]
pub struct MemoryCarts {
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl MemoryCarts {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a cart.
    pub async fn insert(&self, cart: Cart) {
        self.carts.write().await.insert(cart.id, cart);
    }
}

#[async_trait]
impl CartStore for MemoryCarts {
    async fn find_for_user(
        &self,
        id: CartId,
        user_id: UserId,
    ) -> Result<Option<Cart>, StoreError> {
        Ok(self
            .carts
            .read()
            .await
            .get(&id)
            .filter(|cart| cart.user_id == user_id)
            .cloned())
    }
}

// =============================================================================
// MemoryAddresses
// =============================================================================

/// In-memory [`AddressStore`].
#[derive(Debug, Default)]
pub struct MemoryAddresses {
    addresses: RwLock<HashMap<AddressId, Address>>,
}

impl MemoryAddresses {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an address.
    pub async fn insert(&self, address: Address) {
        self.addresses.write().await.insert(address.id, address);
    }
}

#[async_trait]
impl AddressStore for MemoryAddresses {
    async fn find_for_user(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, StoreError> {
        Ok(self
            .addresses
            .read()
            .await
            .get(&id)
            .filter(|address| address.user_id == user_id)
            .cloned())
    }
}

// =============================================================================
// MemoryCatalog
// =============================================================================

/// In-memory [`CatalogStore`].
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    books: RwLock<HashMap<BookId, Book>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a book.
    pub async fn insert(&self, book: Book) {
        self.books.write().await.insert(book.id, book);
    }

    /// Current on-hand quantity, for seed summaries and test assertions.
    pub async fn quantity_of(&self, id: BookId) -> Option<u32> {
        self.books.read().await.get(&id).map(|book| book.quantity)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Book>, StoreError> {
        Ok(self
            .books
            .read()
            .await
            .values()
            .find(|book| book.name == name)
            .cloned())
    }

    async fn update_quantity(&self, id: BookId, quantity: u32) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;
        match books.get_mut(&id) {
            Some(book) => {
                book.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// MemoryOrders
// =============================================================================

#[derive(Debug, Default)]
struct OrdersInner {
    by_id: HashMap<OrderId, Order>,
    by_key: HashMap<IdempotencyKey, OrderId>,
}

/// In-memory [`OrderStore`].
///
/// Keeps a secondary index from idempotency key to order id; insert checks
/// both uniqueness constraints under one write lock.
#[derive(Debug, Default)]
pub struct MemoryOrders {
    inner: RwLock<OrdersInner>,
}

impl MemoryOrders {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders, for test assertions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    /// Whether the store holds no orders.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrders {
    async fn insert(&self, order: Order) -> Result<(), InsertOrderError> {
        let mut inner = self.inner.write().await;

        if inner.by_key.contains_key(&order.idempotency_key) {
            return Err(InsertOrderError::DuplicateKey);
        }
        if inner.by_id.contains_key(&order.id) {
            return Err(InsertOrderError::DuplicateId);
        }

        inner.by_key.insert(order.idempotency_key, order.id.clone());
        inner.by_id.insert(order.id.clone(), order);
        Ok(())
    }

    async fn find_for_user(
        &self,
        id: &OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .by_id
            .get(id)
            .filter(|order| order.user_id == user_id)
            .cloned())
    }

    async fn find_by_key(&self, key: &IdempotencyKey) -> Result<Option<Order>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_key
            .get(key)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn remove(&self, id: &OrderId, user_id: UserId) -> Result<Option<Order>, StoreError> {
        let mut inner = self.inner.write().await;

        let owned = inner
            .by_id
            .get(id)
            .is_some_and(|order| order.user_id == user_id);
        if !owned {
            return Ok(None);
        }

        let removed = inner.by_id.remove(id);
        if let Some(order) = &removed {
            inner.by_key.remove(&order.idempotency_key);
        }
        Ok(removed)
    }
}

// =============================================================================
// MemoryStores
// =============================================================================

/// Concrete in-memory stores, pre-bundled for seeding and tests.
///
/// Keeps the concrete types accessible (their `insert` helpers are not part
/// of the store traits) while [`handles`](Self::handles) produces the
/// trait-object bundle the workflow is wired with.
#[derive(Debug, Default)]
pub struct MemoryStores {
    /// Customer accounts.
    pub users: Arc<MemoryUsers>,
    /// Shopping carts.
    pub carts: Arc<MemoryCarts>,
    /// Shipping addresses.
    pub addresses: Arc<MemoryAddresses>,
    /// Book catalog.
    pub catalog: Arc<MemoryCatalog>,
    /// Placed orders.
    pub orders: Arc<MemoryOrders>,
}

impl MemoryStores {
    /// Create one empty store per collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trait-object view for wiring an order workflow.
    #[must_use]
    pub fn handles(&self) -> Stores {
        // Struct literal fields coerce the concrete Arcs to trait objects.
        Stores {
            users: self.users.clone() as Arc<dyn UserDirectory>,
            carts: self.carts.clone() as Arc<dyn CartStore>,
            addresses: self.addresses.clone() as Arc<dyn AddressStore>,
            catalog: self.catalog.clone() as Arc<dyn CatalogStore>,
            orders: self.orders.clone() as Arc<dyn OrderStore>,
        }
    }
}
