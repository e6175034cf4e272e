//! Integration tests for Inkleaf.
//!
//! # Test Categories
//!
//! - `place_order` - Placement workflow against in-memory stores
//! - `cancel_order` - Cancellation workflow and stock restoration
//! - `concurrency` - Races on stock, idempotency keys, and cancellation
//! - `api_orders` - HTTP surface, driven through `tower::ServiceExt`
//!
//! The support code here seeds a shop, wires a workflow over it with a
//! recording notifier, and can wrap the whole thing in an API router.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use secrecy::SecretString;
use tokio::sync::Mutex;

use inkleaf_api::auth::StaticTokens;
use inkleaf_api::config::ApiKey;
use inkleaf_api::routes;
use inkleaf_api::state::AppState;
use inkleaf_core::Email;
use inkleaf_orders::models::{Address, Cart, User};
use inkleaf_orders::store::MemoryStores;
use inkleaf_orders::{Notifier, NotifyError, OrderNotification, OrderWorkflow, WorkflowConfig};

/// Well-known entities in the seeded fixture.
pub mod fixture {
    use inkleaf_core::{AddressId, BookId, CartId, UserId};

    /// Verified demo customer.
    pub const CUSTOMER: UserId = UserId::new(1);
    /// Account that never finished verification.
    pub const UNVERIFIED: UserId = UserId::new(2);
    /// Second verified customer, for cross-user checks.
    pub const RIVAL: UserId = UserId::new(3);
    /// No such account.
    pub const GHOST: UserId = UserId::new(99);

    /// "The Dispossessed": [`STOCK`] on hand at 20.00.
    pub const BOOK: BookId = BookId::new(1);
    /// Exact title of [`BOOK`].
    pub const BOOK_TITLE: &str = "The Dispossessed";
    /// On-hand quantity of [`BOOK`] after seeding.
    pub const STOCK: u32 = 10;

    /// Customer's cart: [`CART_QUANTITY`] copies of [`BOOK`].
    pub const CART: CartId = CartId::new(5);
    /// Units in [`CART`].
    pub const CART_QUANTITY: u32 = 3;
    /// Rival's cart: 2 copies of [`BOOK`].
    pub const RIVAL_CART: CartId = CartId::new(9);

    /// Customer's home address.
    pub const ADDRESS: AddressId = AddressId::new(7);
    /// Customer's office address.
    pub const OTHER_ADDRESS: AddressId = AddressId::new(8);
    /// Rival's address.
    pub const RIVAL_ADDRESS: AddressId = AddressId::new(11);
}

/// Bearer tokens wired into [`api_router`].
pub mod tokens {
    /// Authenticates as [`fixture::CUSTOMER`](crate::fixture::CUSTOMER).
    pub const CUSTOMER: &str = "alpha-token";
    /// Authenticates as [`fixture::RIVAL`](crate::fixture::RIVAL).
    pub const RIVAL: &str = "rival-token";
    /// Authenticates as [`fixture::UNVERIFIED`](crate::fixture::UNVERIFIED).
    pub const UNVERIFIED: &str = "pending-token";
}

// =============================================================================
// Notifiers
// =============================================================================

/// Notifier that records everything it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OrderNotification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, in delivery order.
    pub async fn recorded(&self) -> Vec<OrderNotification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Notifier that always fails, for asserting delivery errors are swallowed.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &OrderNotification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }
}

// =============================================================================
// TestShop
// =============================================================================

/// A seeded shop: stores, a workflow over them, and a recording notifier.
pub struct TestShop {
    /// Concrete stores, for seeding extras and asserting on state.
    pub stores: MemoryStores,
    /// Workflow wired over [`stores`](Self::stores).
    pub workflow: OrderWorkflow,
    /// Notifier the workflow dispatches to.
    pub notifier: Arc<RecordingNotifier>,
}

impl TestShop {
    /// Seeded shop with the default workflow configuration.
    pub async fn new() -> Self {
        Self::with_config(WorkflowConfig::default()).await
    }

    /// Seeded shop with a custom workflow configuration.
    pub async fn with_config(config: WorkflowConfig) -> Self {
        let stores = MemoryStores::new();
        seed(&stores).await;

        let notifier = Arc::new(RecordingNotifier::new());
        let workflow =
            OrderWorkflow::new(stores.handles(), notifier.clone() as Arc<dyn Notifier>, config);

        Self {
            stores,
            workflow,
            notifier,
        }
    }
}

/// Seed the fixture data every test starts from.
///
/// The catalog, customer, cart, and addresses come from the demo seeder; a
/// second verified customer with a cart and an address is layered on top.
pub async fn seed(stores: &MemoryStores) {
    inkleaf_api::seed::demo(stores).await;

    stores
        .users
        .insert(User {
            id: fixture::RIVAL,
            email: Email::parse("rival@example.com").expect("fixture email is well-formed"),
            verified: true,
        })
        .await;
    stores
        .carts
        .insert(Cart {
            id: fixture::RIVAL_CART,
            user_id: fixture::RIVAL,
            book_id: fixture::BOOK,
            book_quantity: 2,
        })
        .await;
    stores
        .addresses
        .insert(Address {
            id: fixture::RIVAL_ADDRESS,
            user_id: fixture::RIVAL,
            label: "flat".to_string(),
        })
        .await;
}

// =============================================================================
// API router
// =============================================================================

/// Build an API router over a fresh seeded shop.
///
/// Returns the shop too, so tests can reach behind the HTTP surface and
/// assert on stores and notifications.
pub async fn api_router() -> (Router, TestShop) {
    let shop = TestShop::new().await;

    let api_keys = vec![
        ApiKey {
            token: SecretString::from(tokens::CUSTOMER),
            user_id: fixture::CUSTOMER,
        },
        ApiKey {
            token: SecretString::from(tokens::RIVAL),
            user_id: fixture::RIVAL,
        },
        ApiKey {
            token: SecretString::from(tokens::UNVERIFIED),
            user_id: fixture::UNVERIFIED,
        },
    ];
    let identity = Arc::new(StaticTokens::from_keys(&api_keys));

    let state = AppState::new(shop.workflow.clone(), identity);
    let router = Router::new().merge(routes::routes()).with_state(state);

    (router, shop)
}
