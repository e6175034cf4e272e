//! Shipping address model.

use serde::{Deserialize, Serialize};

use inkleaf_core::{AddressId, UserId};

/// A shipping address on file for a user.
///
/// The order workflow only checks existence and ownership; the postal fields
/// live with the fulfillment side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// User the address belongs to.
    pub user_id: UserId,
    /// Free-form label, e.g. "home".
    pub label: String,
}
