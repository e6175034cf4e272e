//! Read cache for placed orders.

use moka::future::Cache;

use inkleaf_core::OrderId;

use crate::config::CacheConfig;
use crate::models::Order;

/// Order read cache.
///
/// Backs the lookup path only: placements insert, cancellations invalidate,
/// and a miss falls through to the order store. Entries expire on a TTL so a
/// stale row cannot outlive a missed invalidation for long.
pub(crate) struct OrderCache {
    cache: Cache<OrderId, Order>,
}

impl OrderCache {
    pub(crate) fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.time_to_live)
            .build();

        Self { cache }
    }

    pub(crate) async fn insert(&self, order: Order) {
        self.cache.insert(order.id.clone(), order).await;
    }

    pub(crate) async fn get(&self, id: &OrderId) -> Option<Order> {
        self.cache.get(id).await
    }

    pub(crate) async fn invalidate(&self, id: &OrderId) {
        self.cache.invalidate(id).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use inkleaf_core::{AddressId, BookId, CartId, IdempotencyKey, Price, UserId};

    use super::*;

    fn sample_order(id: &str) -> Order {
        Order {
            id: OrderId::parse(id).unwrap(),
            user_id: UserId::new(1),
            book_id: BookId::new(1),
            address_id: AddressId::new(1),
            idempotency_key: IdempotencyKey::Cart(CartId::new(5)),
            quantity: 2,
            unit_price: Price::from_cents(2000),
            total_price: Price::from_cents(2000).total_for(2),
            created_at: Utc::now(),
        }
    }

    fn small_config(ttl: Duration) -> CacheConfig {
        CacheConfig {
            capacity: 16,
            time_to_live: ttl,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = OrderCache::new(&small_config(Duration::from_secs(60)));
        let order = sample_order("AAAAAAAA1");

        cache.insert(order.clone()).await;

        let hit = cache.get(&order.id).await.unwrap();
        assert_eq!(hit.id, order.id);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = OrderCache::new(&small_config(Duration::from_secs(60)));
        let order = sample_order("AAAAAAAA1");

        cache.insert(order.clone()).await;
        cache.invalidate(&order.id).await;

        assert!(cache.get(&order.id).await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = OrderCache::new(&small_config(Duration::from_millis(20)));
        let order = sample_order("AAAAAAAA1");

        cache.insert(order.clone()).await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.get(&order.id).await.is_none());
    }
}
