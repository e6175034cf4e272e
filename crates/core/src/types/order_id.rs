//! Customer-facing order identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OrderId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderIdError {
    /// The input is not exactly [`OrderId::LENGTH`] characters long.
    #[error("order id must be exactly {expected} characters, got {actual}")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a character outside `A-Z0-9`.
    #[error("order id may only contain uppercase letters and digits")]
    InvalidCharacter,
}

/// A customer-facing order identifier.
///
/// Order ids are short random tokens rather than sequential integers, so they
/// can be read back by a customer and do not leak order volume. The format is
/// fixed: nine characters drawn from `A-Z0-9`.
///
/// ## Examples
///
/// ```
/// use inkleaf_core::OrderId;
///
/// assert!(OrderId::parse("7QX2M9KP4").is_ok());
/// assert!(OrderId::parse("short").is_err());     // wrong length
/// assert!(OrderId::parse("7qx2m9kp4").is_err()); // lowercase
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Fixed length of every order id.
    pub const LENGTH: usize = 9;

    /// Characters an order id may contain.
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Parse an `OrderId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly nine characters long or
    /// contains anything other than uppercase ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, OrderIdError> {
        if s.len() != Self::LENGTH {
            return Err(OrderIdError::WrongLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(OrderIdError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
