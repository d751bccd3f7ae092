//! Bounded, ordered hand of cards.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardKind};
use crate::core::CardId;

/// Cards currently available to one actor.
///
/// Order is draw order. The hand never holds more than `capacity` cards;
/// `Deck::draw` stops early instead of overfilling it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    capacity: usize,
}

impl Hand {
    /// Create an empty hand.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Hands must hold at least 1 card");
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    /// Add a card, handing it back if the hand is full.
    pub fn try_add(&mut self, card: Card) -> Result<(), Card> {
        if self.is_full() {
            return Err(card);
        }
        self.cards.push(card);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Remove a card if present.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Remove a card that must be in the hand.
    ///
    /// # Panics
    ///
    /// If the card is not in this hand.
    pub fn take(&mut self, id: CardId) -> Card {
        self.remove(id)
            .unwrap_or_else(|| panic!("{} is not in the acting hand", id))
    }

    /// First card of the given kind, in draw order.
    #[must_use]
    pub fn first_of(&self, kind: CardKind) -> Option<CardId> {
        self.cards.iter().find(|c| c.kind.same_kind(kind)).map(|c| c.id)
    }

    /// All Defend cards, in draw order.
    #[must_use]
    pub fn defend_cards(&self) -> Vec<CardId> {
        self.cards.iter().filter(|c| c.is_defend()).map(|c| c.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Empty the hand, returning its cards in order.
    pub fn drain(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32, kind: CardKind) -> Card {
        Card::new(CardId::new(id), kind)
    }

    #[test]
    fn test_capacity() {
        let mut hand = Hand::new(2);
        assert!(hand.try_add(card(0, CardKind::Attack)).is_ok());
        assert!(hand.try_add(card(1, CardKind::Defend)).is_ok());
        assert!(hand.is_full());

        let rejected = hand.try_add(card(2, CardKind::Charge)).unwrap_err();
        assert_eq!(rejected.id, CardId::new(2));
        assert_eq!(hand.len(), 2);
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut hand = Hand::new(5);
        hand.try_add(card(0, CardKind::Attack)).unwrap();
        hand.try_add(card(1, CardKind::Defend)).unwrap();
        hand.try_add(card(2, CardKind::Defend)).unwrap();

        assert_eq!(hand.first_of(CardKind::Defend), Some(CardId::new(1)));
        assert_eq!(hand.defend_cards(), vec![CardId::new(1), CardId::new(2)]);
        assert_eq!(hand.first_of(CardKind::Medicine), None);

        let removed = hand.remove(CardId::new(1)).unwrap();
        assert_eq!(removed.kind, CardKind::Defend);
        assert!(!hand.contains(CardId::new(1)));
        assert!(hand.remove(CardId::new(1)).is_none());
    }

    #[test]
    #[should_panic(expected = "not in the acting hand")]
    fn test_take_missing_card_panics() {
        let mut hand = Hand::new(3);
        hand.take(CardId::new(9));
    }

    #[test]
    fn test_drain() {
        let mut hand = Hand::new(3);
        hand.try_add(card(0, CardKind::Attack)).unwrap();
        hand.try_add(card(1, CardKind::Medicine)).unwrap();

        let cards = hand.drain();
        assert_eq!(cards.len(), 2);
        assert!(hand.is_empty());
    }
}
