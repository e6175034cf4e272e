//! Order id generation.

use rand::Rng;

use inkleaf_core::OrderId;

/// Generate a random order id: nine characters from `A-Z0-9`.
///
/// Uniqueness is not guaranteed here; the order store enforces it and the
/// workflow regenerates on collision.
#[must_use]
#[allow(clippy::indexing_slicing)] // index is drawn from 0..ALPHABET.len()
pub fn generate_order_id() -> OrderId {
    let mut rng = rand::rng();

    let token: String = (0..OrderId::LENGTH)
        .map(|_| {
            let index = rng.random_range(0..OrderId::ALPHABET.len());
            char::from(OrderId::ALPHABET[index])
        })
        .collect();

    OrderId::parse(&token).expect("generated token matches the order id format")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generated_ids_are_well_formed() {
        for _ in 0..100 {
            let id = generate_order_id();
            assert_eq!(id.as_str().len(), OrderId::LENGTH);
            assert!(OrderId::parse(id.as_str()).is_ok());
        }
    }

    #[test]
    fn test_generated_ids_vary() {
        let ids: HashSet<OrderId> = (0..50).map(|_| generate_order_id()).collect();
        // 36^9 possible tokens; 50 draws colliding would point at a broken rng.
        assert_eq!(ids.len(), 50);
    }
}
