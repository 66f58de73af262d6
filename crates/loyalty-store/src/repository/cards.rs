//! # Card Repository
//!
//! Loyalty cards by number. Cards are owned here and handed out by
//! reference; redemption needs `get_mut`.

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use loyalty_core::LoyaltyCard;

#[derive(Debug, Clone, Default)]
pub struct CardRepository {
    cards: BTreeMap<String, LoyaltyCard>,
}

impl CardRepository {
    pub fn new() -> Self {
        CardRepository::default()
    }

    /// Registers a card.
    ///
    /// ## Returns
    /// * `Err(StoreError::Duplicate)` - Card number already registered
    pub fn insert(&mut self, card: LoyaltyCard) -> StoreResult<()> {
        debug!(number = %card.number(), coupons = card.coupons().len(), "Registering card");

        if self.cards.contains_key(card.number()) {
            return Err(StoreError::duplicate("Card", card.number()));
        }
        self.cards.insert(card.number().to_string(), card);
        Ok(())
    }

    pub fn get(&self, number: &str) -> Option<&LoyaltyCard> {
        self.cards.get(number)
    }

    pub fn get_mut(&mut self, number: &str) -> Option<&mut LoyaltyCard> {
        self.cards.get_mut(number)
    }

    pub fn require(&self, number: &str) -> StoreResult<&LoyaltyCard> {
        self.cards
            .get(number)
            .ok_or_else(|| StoreError::not_found("Card", number))
    }

    pub fn require_mut(&mut self, number: &str) -> StoreResult<&mut LoyaltyCard> {
        self.cards
            .get_mut(number)
            .ok_or_else(|| StoreError::not_found("Card", number))
    }

    pub fn remove(&mut self, number: &str) -> Option<LoyaltyCard> {
        debug!(number = %number, "Removing card");
        self.cards.remove(number)
    }

    /// Cards in number order.
    pub fn iter(&self) -> impl Iterator<Item = &LoyaltyCard> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loyalty_core::Money;

    #[test]
    fn test_register_and_mutate() {
        let mut cards = CardRepository::new();
        cards.insert(LoyaltyCard::new("10101").unwrap()).unwrap();

        cards
            .require_mut("10101")
            .unwrap()
            .credit(Money::from_cents(40))
            .unwrap();
        assert_eq!(cards.require("10101").unwrap().balance().cents(), 40);
    }

    #[test]
    fn test_duplicate_and_missing() {
        let mut cards = CardRepository::new();
        cards.insert(LoyaltyCard::new("10101").unwrap()).unwrap();

        assert!(matches!(
            cards.insert(LoyaltyCard::new("10101").unwrap()),
            Err(StoreError::Duplicate { .. })
        ));
        assert!(cards.require_mut("20202").unwrap_err().is_not_found());
        assert!(cards.get("20202").is_none());
    }

    #[test]
    fn test_iter_and_remove() {
        let mut cards = CardRepository::new();
        cards.insert(LoyaltyCard::new("20202").unwrap()).unwrap();
        cards.insert(LoyaltyCard::new("10101").unwrap()).unwrap();

        let numbers: Vec<_> = cards.iter().map(LoyaltyCard::number).collect();
        assert_eq!(numbers, ["10101", "20202"]);

        assert!(cards.remove("10101").is_some());
        assert_eq!(cards.len(), 1);
    }
}
