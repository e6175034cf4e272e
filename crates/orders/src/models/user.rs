//! Customer account model.

use serde::{Deserialize, Serialize};

use inkleaf_core::{Email, UserId};

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Address notifications are sent to.
    pub email: Email,
    /// Whether the account finished email verification. Unverified accounts
    /// cannot place, cancel, or look up orders.
    pub verified: bool,
}
