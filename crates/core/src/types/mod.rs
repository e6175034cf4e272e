//! Core types for Inkleaf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod idempotency;
pub mod order_id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use idempotency::IdempotencyKey;
pub use order_id::{OrderId, OrderIdError};
pub use price::{Price, PriceError};
