//! Inkleaf Core - Shared types library.
//!
//! This crate provides the common vocabulary types used across the Inkleaf
//! order services:
//! - `orders` - Order placement and cancellation workflow
//! - `api` - Public HTTP surface in front of the workflow
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no locking, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, order tokens, prices,
//!   emails, and idempotency keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
