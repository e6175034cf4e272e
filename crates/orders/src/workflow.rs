//! Order placement and cancellation workflow.
//!
//! The workflow owns the transaction script for the order lifecycle:
//! validate the actor, deduplicate on the idempotency key, move stock
//! through the [`InventoryLedger`], persist the order, then notify. Stock
//! movement and order persistence happen under a per-book [`StockGuard`], so
//! concurrent purchases of the same title serialize instead of racing the
//! stock check.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use inkleaf_core::{AddressId, CartId, IdempotencyKey, OrderId, Price, UserId};

use crate::cache::OrderCache;
use crate::config::WorkflowConfig;
use crate::error::OrderError;
use crate::ledger::{InventoryLedger, StockGuard};
use crate::models::{Book, Order, User};
use crate::notify::{NotificationKind, NotificationMode, Notifier, OrderNotification};
use crate::store::{InsertOrderError, StoreError, Stores};
use crate::token::generate_order_id;

// =============================================================================
// Requests & receipts
// =============================================================================

/// How a placement identifies what to buy.
#[derive(Debug, Clone)]
pub enum Placement {
    /// Check out an existing cart; book and quantity come from the cart.
    FromCart {
        /// Cart to check out.
        cart_id: CartId,
    },
    /// Buy a book directly by title, keyed by a client-supplied token.
    Direct {
        /// Exact catalog title.
        book_name: String,
        /// Units to buy; must be at least 1.
        quantity: u32,
        /// Client-generated idempotency token.
        token: Uuid,
    },
}

impl Placement {
    /// The idempotency key this placement is deduplicated on.
    #[must_use]
    pub const fn idempotency_key(&self) -> IdempotencyKey {
        match self {
            Self::FromCart { cart_id } => IdempotencyKey::Cart(*cart_id),
            Self::Direct { token, .. } => IdempotencyKey::Token(*token),
        }
    }
}

/// Receipt returned from a successful placement.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    /// Customer-facing order id.
    pub order_id: OrderId,
    /// Title purchased.
    pub book_name: String,
    /// Unit price at placement.
    pub unit_price: Price,
    /// Units purchased.
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub total_price: Decimal,
}

/// Receipt returned from a successful cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct CancellationReceipt {
    /// Order that was cancelled.
    pub order_id: OrderId,
    /// Units returned to stock.
    pub quantity: u32,
    /// Total that had been charged.
    pub total_price: Decimal,
}

// =============================================================================
// OrderWorkflow
// =============================================================================

/// Order lifecycle coordinator.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct OrderWorkflow {
    inner: Arc<WorkflowInner>,
}

struct WorkflowInner {
    stores: Stores,
    ledger: InventoryLedger,
    notifier: Arc<dyn Notifier>,
    cache: OrderCache,
    config: WorkflowConfig,
}

impl OrderWorkflow {
    /// Wire up a workflow over the given stores and notifier.
    #[must_use]
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>, config: WorkflowConfig) -> Self {
        let ledger = InventoryLedger::new(Arc::clone(&stores.catalog), config.lock);
        let cache = OrderCache::new(&config.cache);

        Self {
            inner: Arc::new(WorkflowInner {
                stores,
                ledger,
                notifier,
                cache,
                config,
            }),
        }
    }

    /// Place an order.
    ///
    /// Validates the actor, deduplicates on the placement's idempotency key,
    /// reserves stock and persists the order atomically with respect to
    /// other placements of the same book, then fires a notification.
    ///
    /// # Errors
    ///
    /// See [`OrderError`] for the failure taxonomy. On any error the catalog
    /// and the order store are left unchanged.
    #[instrument(skip(self, placement), fields(user = %user_id, key = %placement.idempotency_key()))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        placement: Placement,
        address_id: AddressId,
    ) -> Result<OrderReceipt, OrderError> {
        if let Placement::Direct { quantity: 0, .. } = &placement {
            return Err(OrderError::InvalidQuantity);
        }

        let user = self.verified_user(user_id).await?;
        let key = placement.idempotency_key();

        // Advisory duplicate check; the authoritative one runs under the
        // stock guard.
        if self.inner.stores.orders.find_by_key(&key).await?.is_some() {
            return Err(OrderError::OrderAlreadyExists);
        }

        let (book, quantity) = self.resolve_placement(user_id, &placement).await?;

        // Early stock check so an obvious shortfall fails before the
        // address lookup.
        if quantity > book.quantity {
            return Err(OrderError::InsufficientStock {
                requested: quantity,
                available: book.quantity,
            });
        }

        if self
            .inner
            .stores
            .addresses
            .find_for_user(address_id, user_id)
            .await?
            .is_none()
        {
            return Err(OrderError::AddressNotFound);
        }

        let guard = self.inner.ledger.guard(book.id).await?;

        // Re-check under the guard: a placement with the same key may have
        // committed since the advisory check.
        if self.inner.stores.orders.find_by_key(&key).await?.is_some() {
            return Err(OrderError::OrderAlreadyExists);
        }

        let book = self.inner.ledger.reserve(&guard, quantity).await?;

        let order = match self
            .persist_order(&book, quantity, key, user_id, address_id)
            .await
        {
            Ok(order) => order,
            Err(err) => {
                self.rollback_reservation(&guard, quantity).await;
                return Err(err);
            }
        };

        // Cache writes stay under the guard so they serialize with the
        // invalidate in cancellation.
        self.inner.cache.insert(order.clone()).await;
        drop(guard);

        let receipt = OrderReceipt {
            order_id: order.id.clone(),
            book_name: book.name.clone(),
            unit_price: order.unit_price,
            quantity: order.quantity,
            total_price: order.total_price,
        };

        self.dispatch(OrderNotification {
            kind: NotificationKind::Placed,
            recipient: user.email,
            order_id: order.id,
            book_name: book.name,
            quantity: order.quantity,
            total_price: order.total_price,
        })
        .await;

        Ok(receipt)
    }

    /// Cancel an order and return its stock.
    ///
    /// Removal and stock release happen under the same per-book guard as
    /// placements. A second cancellation of the same order loses the removal
    /// race and reports [`OrderError::OrderNotFound`].
    ///
    /// # Errors
    ///
    /// See [`OrderError`] for the failure taxonomy.
    #[instrument(skip(self), fields(user = %user_id, order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        user_id: UserId,
        order_id: &str,
    ) -> Result<CancellationReceipt, OrderError> {
        let order_id = OrderId::parse(order_id)?;
        let user = self.verified_user(user_id).await?;

        let order = self
            .inner
            .stores
            .orders
            .find_for_user(&order_id, user_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        let book = self
            .inner
            .stores
            .catalog
            .find_by_id(order.book_id)
            .await?
            .ok_or(OrderError::BookNotFound)?;

        let guard = self.inner.ledger.guard(order.book_id).await?;

        // The remove is the commit point: whoever gets the row back owns
        // the release.
        let Some(removed) = self.inner.stores.orders.remove(&order_id, user_id).await? else {
            return Err(OrderError::OrderNotFound);
        };

        if let Err(err) = self.inner.ledger.release(&guard, removed.quantity).await {
            self.restore_order(removed).await;
            return Err(err.into());
        }
        self.inner.cache.invalidate(&order_id).await;
        drop(guard);

        let receipt = CancellationReceipt {
            order_id: order_id.clone(),
            quantity: removed.quantity,
            total_price: removed.total_price,
        };

        self.dispatch(OrderNotification {
            kind: NotificationKind::Cancelled,
            recipient: user.email,
            order_id,
            book_name: book.name,
            quantity: removed.quantity,
            total_price: removed.total_price,
        })
        .await;

        Ok(receipt)
    }

    /// Look up one of the user's orders.
    ///
    /// Served from the cache while the placement-time entry is fresh,
    /// otherwise from the store. Lookups never write the cache: only
    /// placement inserts and only cancellation invalidates, both under the
    /// per-book guard, so a lookup that reads the store just before a
    /// cancellation commits cannot re-seed the removed order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] for unknown ids and for orders
    /// that belong to someone else.
    #[instrument(skip(self), fields(user = %user_id, order_id = %order_id))]
    pub async fn find_order(&self, user_id: UserId, order_id: &str) -> Result<Order, OrderError> {
        let order_id = OrderId::parse(order_id)?;
        self.verified_user(user_id).await?;

        if let Some(order) = self.inner.cache.get(&order_id).await {
            // Ownership is checked on hits too; other users' lookups fall
            // through to the store and come back empty.
            if order.user_id == user_id {
                return Ok(order);
            }
        }

        self.inner
            .stores
            .orders
            .find_for_user(&order_id, user_id)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn verified_user(&self, user_id: UserId) -> Result<User, OrderError> {
        match self.inner.stores.users.find(user_id).await? {
            Some(user) if user.verified => Ok(user),
            _ => Err(OrderError::UserNotFound),
        }
    }

    async fn resolve_placement(
        &self,
        user_id: UserId,
        placement: &Placement,
    ) -> Result<(Book, u32), OrderError> {
        match placement {
            Placement::FromCart { cart_id } => {
                let cart = self
                    .inner
                    .stores
                    .carts
                    .find_for_user(*cart_id, user_id)
                    .await?
                    .ok_or(OrderError::CartNotFound)?;

                let book = self
                    .inner
                    .stores
                    .catalog
                    .find_by_id(cart.book_id)
                    .await?
                    .ok_or(OrderError::BookNotFound)?;

                Ok((book, cart.book_quantity))
            }
            Placement::Direct {
                book_name,
                quantity,
                ..
            } => {
                let book = self
                    .inner
                    .stores
                    .catalog
                    .find_by_name(book_name)
                    .await?
                    .ok_or(OrderError::BookNotFound)?;

                Ok((book, *quantity))
            }
        }
    }

    /// Insert the order, regenerating the id on collision.
    async fn persist_order(
        &self,
        book: &Book,
        quantity: u32,
        key: IdempotencyKey,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Order, OrderError> {
        for _ in 0..self.inner.config.id_attempts {
            let order = Order {
                id: generate_order_id(),
                user_id,
                book_id: book.id,
                address_id,
                idempotency_key: key,
                quantity,
                unit_price: book.price,
                total_price: book.price.total_for(quantity),
                created_at: Utc::now(),
            };

            match self.inner.stores.orders.insert(order.clone()).await {
                Ok(()) => return Ok(order),
                Err(InsertOrderError::DuplicateId) => {
                    warn!(order_id = %order.id, "order id collision, regenerating");
                }
                Err(InsertOrderError::DuplicateKey) => return Err(OrderError::OrderAlreadyExists),
                Err(InsertOrderError::Store(err)) => return Err(OrderError::Store(err)),
            }
        }

        Err(OrderError::Store(StoreError::Conflict(
            "order id generation exhausted after repeated collisions".to_owned(),
        )))
    }

    /// Undo a reservation after a failed insert; failures here are logged.
    async fn rollback_reservation(&self, guard: &StockGuard, quantity: u32) {
        if let Err(err) = self.inner.ledger.release(guard, quantity).await {
            error!(error = %err, book_id = %guard.book_id(), "failed to roll back reservation");
        }
    }

    /// Re-insert an order whose stock release failed, keeping the order
    /// store and the catalog consistent with each other.
    async fn restore_order(&self, order: Order) {
        let order_id = order.id.clone();
        if let Err(err) = self.inner.stores.orders.insert(order).await {
            error!(error = %err, order_id = %order_id, "failed to restore order after release failure");
        }
    }

    /// Hand a notification to the notifier per the configured mode.
    ///
    /// Delivery failures are logged and swallowed; notifications never fail
    /// an order operation.
    async fn dispatch(&self, notification: OrderNotification) {
        match self.inner.config.notification {
            NotificationMode::Immediate => {
                if let Err(err) = self.inner.notifier.send(&notification).await {
                    warn!(error = %err, order_id = %notification.order_id, "notification delivery failed");
                }
            }
            NotificationMode::Deferred(delay) => {
                let notifier = Arc::clone(&self.inner.notifier);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Err(err) = notifier.send(&notification).await {
                        warn!(error = %err, order_id = %notification.order_id, "notification delivery failed");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_placement_key_is_the_cart_id() {
        let placement = Placement::FromCart {
            cart_id: CartId::new(5),
        };

        assert_eq!(
            placement.idempotency_key(),
            IdempotencyKey::Cart(CartId::new(5))
        );
    }

    #[test]
    fn test_direct_placement_key_is_the_token() {
        let token = Uuid::new_v4();
        let placement = Placement::Direct {
            book_name: "The Dispossessed".to_owned(),
            quantity: 1,
            token,
        };

        assert_eq!(placement.idempotency_key(), IdempotencyKey::Token(token));
    }
}
