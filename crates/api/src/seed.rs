//! Demo data for local runs.
//!
//! Seeded when `INKLEAF_DEMO_SEED` is set, so the API answers real requests
//! out of the box: user 1 (any configured token mapping to it) can check out
//! cart 5 to address 7, or buy by title directly.

use tracing::info;

use inkleaf_core::{AddressId, BookId, CartId, Email, Price, UserId};
use inkleaf_orders::models::{Address, Book, Cart, User};
use inkleaf_orders::store::MemoryStores;

/// Seed the demo catalog, accounts, cart, and addresses.
///
/// Inserts overwrite by id, so reseeding resets the data.
pub async fn demo(stores: &MemoryStores) {
    stores
        .catalog
        .insert(Book {
            id: BookId::new(1),
            name: "The Dispossessed".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            price: Price::from_cents(2000),
            quantity: 10,
        })
        .await;
    stores
        .catalog
        .insert(Book {
            id: BookId::new(2),
            name: "A Wizard of Earthsea".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            price: Price::from_cents(1250),
            quantity: 4,
        })
        .await;

    stores
        .users
        .insert(User {
            id: UserId::new(1),
            email: Email::parse("ada@example.com").expect("demo email is well-formed"),
            verified: true,
        })
        .await;
    // Unverified account; placements against it are rejected.
    stores
        .users
        .insert(User {
            id: UserId::new(2),
            email: Email::parse("pending@example.com").expect("demo email is well-formed"),
            verified: false,
        })
        .await;

    stores
        .carts
        .insert(Cart {
            id: CartId::new(5),
            user_id: UserId::new(1),
            book_id: BookId::new(1),
            book_quantity: 3,
        })
        .await;

    stores
        .addresses
        .insert(Address {
            id: AddressId::new(7),
            user_id: UserId::new(1),
            label: "home".to_string(),
        })
        .await;
    stores
        .addresses
        .insert(Address {
            id: AddressId::new(8),
            user_id: UserId::new(1),
            label: "office".to_string(),
        })
        .await;

    info!(
        books = 2,
        users = 2,
        carts = 1,
        addresses = 2,
        "demo data seeded"
    );
}

#[cfg(test)]
mod tests {
    use inkleaf_orders::store::CartStore;

    use super::*;

    #[tokio::test]
    async fn test_demo_seed_is_consistent() {
        let stores = MemoryStores::new();
        demo(&stores).await;

        // The cart points at a real book with enough stock for checkout.
        let cart = stores
            .carts
            .find_for_user(CartId::new(5), UserId::new(1))
            .await
            .ok()
            .flatten();
        let Some(cart) = cart else {
            panic!("demo cart missing");
        };

        let quantity = stores.catalog.quantity_of(cart.book_id).await;
        assert!(quantity.is_some_and(|q| q >= cart.book_quantity));
    }
}
