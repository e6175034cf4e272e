//! Inkleaf Orders - order placement and cancellation workflow.
//!
//! This crate wires five storage traits, a per-book inventory ledger, and a
//! notification channel into one [`OrderWorkflow`]:
//!
//! - [`store`] - Persistence traits plus in-memory implementations
//! - [`ledger`] - The only writer of book stock; guards, reserve, release
//! - [`locks`] - Keyed async locks backing the ledger's guards
//! - [`workflow`] - Placement, cancellation, and cached lookup
//! - [`notify`] - Notifier trait, log-backed default, dispatch modes
//! - [`models`] - Books, carts, addresses, users, orders
//!
//! # Concurrency
//!
//! Stock arithmetic and order persistence happen under a per-book guard, so
//! two purchases of the last copy cannot both succeed: one wins, the other
//! sees the updated count. See [`ledger::InventoryLedger`].

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
pub mod config;
pub mod error;
pub mod ledger;
pub mod locks;
pub mod models;
pub mod notify;
pub mod store;
pub mod token;
pub mod workflow;

pub use config::{CacheConfig, LockConfig, WorkflowConfig};
pub use error::OrderError;
pub use notify::{
    LogNotifier, NotificationKind, NotificationMode, Notifier, NotifyError, OrderNotification,
};
pub use store::Stores;
pub use workflow::{CancellationReceipt, OrderReceipt, OrderWorkflow, Placement};
