//! Shared draw and discard piles.
//!
//! Cards are drawn from the front of the draw pile. When it runs dry the
//! discard pile is shuffled into a new draw pile; when both are empty the
//! draw simply stops short.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::card::{Card, CardKind, EquipmentKind};
use super::hand::Hand;
use crate::core::{CardId, DeckComposition, GameRng};

/// Draw pile plus discard pile, owning its shuffle stream.
#[derive(Clone, Debug)]
pub struct Deck {
    draw_pile: VecDeque<Card>,
    discard_pile: Vec<Card>,
    rng: GameRng,
    reshuffles: u32,
}

impl Deck {
    /// Build and shuffle a deck. Card ids are assigned in composition
    /// order before the shuffle.
    #[must_use]
    pub fn new(composition: &DeckComposition, rng: GameRng) -> Self {
        let kinds = [
            (CardKind::Attack, composition.attack),
            (CardKind::Defend, composition.defend),
            (CardKind::Medicine, composition.medicine),
            (CardKind::Charge, composition.charge),
            (CardKind::equipment(EquipmentKind::MekaLeg), composition.meka_leg),
            (CardKind::equipment(EquipmentKind::ProtectionGem), composition.protection_gem),
        ];

        let cards = kinds
            .into_iter()
            .flat_map(|(kind, count)| std::iter::repeat(kind).take(count))
            .enumerate()
            .map(|(i, kind)| Card::new(CardId::new(i as u32), kind))
            .collect();

        let mut deck = Self::from_ordered(cards, rng);
        deck.shuffle();
        info!(cards = deck.draw_count(), "deck initialized");
        deck
    }

    /// Deck whose draw pile is exactly `cards`, front first. Not shuffled.
    #[must_use]
    pub fn from_ordered(cards: Vec<Card>, rng: GameRng) -> Self {
        Self {
            draw_pile: cards.into(),
            discard_pile: Vec::new(),
            rng,
            reshuffles: 0,
        }
    }

    /// Uniformly permute the draw pile.
    pub fn shuffle(&mut self) {
        self.rng.shuffle(self.draw_pile.make_contiguous());
        debug!(cards = self.draw_pile.len(), "deck shuffled");
    }

    /// Take the next card, reshuffling the discard pile in if needed.
    ///
    /// Returns `None` only when both piles are empty.
    pub fn draw_one(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() {
            if self.discard_pile.is_empty() {
                warn!("no cards left to draw");
                return None;
            }
            self.reshuffle();
        }

        let card = self.draw_pile.pop_front()?;
        debug!(card = %card, "drew card");
        Some(card)
    }

    /// Draw up to `count` cards into `hand`.
    ///
    /// Stops early when the hand is full or both piles are empty. Returns
    /// the ids of the cards actually drawn, in draw order.
    pub fn draw(&mut self, count: usize, hand: &mut Hand) -> Vec<CardId> {
        let mut drawn = Vec::with_capacity(count);

        for _ in 0..count {
            if hand.is_full() {
                debug!(capacity = hand.capacity(), "hand full, skipping remaining draws");
                break;
            }
            let Some(card) = self.draw_one() else {
                break;
            };
            let id = card.id;
            if let Err(card) = hand.try_add(card) {
                // Checked `is_full` above, so this cannot lose a card.
                self.discard(card);
                continue;
            }
            drawn.push(id);
        }

        drawn
    }

    /// Put a card on the discard pile.
    pub fn discard(&mut self, card: Card) {
        debug!(card = %card, "discarded card");
        self.discard_pile.push(card);
    }

    /// Discard several cards.
    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.discard(card);
        }
    }

    fn reshuffle(&mut self) {
        info!(cards = self.discard_pile.len(), "deck empty, shuffling discard pile into deck");
        self.draw_pile.extend(self.discard_pile.drain(..));
        self.reshuffles += 1;
        self.shuffle();
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draw_pile.len()
    }

    /// Cards in the discard pile.
    #[must_use]
    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    /// How many times the discard pile has been shuffled back in.
    #[must_use]
    pub fn reshuffle_count(&self) -> u32 {
        self.reshuffles
    }

    /// Peek at the draw pile, front first.
    pub fn draw_pile(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile.iter()
    }

    pub fn discard_pile(&self) -> impl Iterator<Item = &Card> {
        self.discard_pile.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(kinds: &[CardKind]) -> Deck {
        let cards = kinds
            .iter()
            .enumerate()
            .map(|(i, &k)| Card::new(CardId::new(i as u32), k))
            .collect();
        Deck::from_ordered(cards, GameRng::new(1))
    }

    #[test]
    fn test_default_composition() {
        let deck = Deck::new(&DeckComposition::default(), GameRng::new(5));
        assert_eq!(deck.draw_count(), 46);
        assert_eq!(deck.discard_count(), 0);

        let gems = deck
            .draw_pile()
            .filter(|c| c.equipment_kind() == Some(EquipmentKind::ProtectionGem))
            .count();
        assert_eq!(gems, 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let deck = Deck::new(&DeckComposition::default(), GameRng::new(5));
        let mut ids: Vec<_> = deck.draw_pile().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 46);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Deck::new(&DeckComposition::default(), GameRng::new(3));
        let b = Deck::new(&DeckComposition::default(), GameRng::new(3));
        let order_a: Vec<_> = a.draw_pile().map(|c| c.id).collect();
        let order_b: Vec<_> = b.draw_pile().map(|c| c.id).collect();
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_draw_from_front() {
        let mut deck = ordered(&[CardKind::Attack, CardKind::Defend, CardKind::Charge]);
        let mut hand = Hand::new(10);

        let drawn = deck.draw(2, &mut hand);
        let kinds: Vec<CardKind> = drawn.iter().filter_map(|&id| hand.get(id)).map(|c| c.kind).collect();
        assert_eq!(kinds, vec![
            CardKind::Attack,
            CardKind::Defend
        ]);
        assert_eq!(hand.len(), 2);
        assert_eq!(deck.draw_count(), 1);
        // Drawn cards live only in the hand.
        assert!(drawn.iter().all(|&id| hand.contains(id)));
        assert!(deck.draw_pile().all(|c| !drawn.contains(&c.id)));
    }

    #[test]
    fn test_draw_stops_at_hand_capacity() {
        let mut deck = ordered(&[CardKind::Attack; 5]);
        let mut hand = Hand::new(3);

        let drawn = deck.draw(5, &mut hand);
        assert_eq!(drawn.len(), 3);
        assert!(hand.is_full());
        assert_eq!(deck.draw_count(), 2);
    }

    #[test]
    fn test_reshuffle_on_empty() {
        let mut deck = ordered(&[CardKind::Attack, CardKind::Defend]);
        let mut hand = Hand::new(10);

        deck.draw(2, &mut hand);
        deck.discard_all(hand.drain());
        assert_eq!(deck.draw_count(), 0);
        assert_eq!(deck.discard_count(), 2);

        let drawn = deck.draw(1, &mut hand);
        assert_eq!(drawn.len(), 1);
        assert_eq!(deck.reshuffle_count(), 1);
        assert_eq!(deck.discard_count(), 0);
        assert_eq!(deck.draw_count(), 1);
    }

    #[test]
    fn test_partial_draw_when_exhausted() {
        let mut deck = ordered(&[CardKind::Medicine, CardKind::Medicine]);
        let mut hand = Hand::new(10);

        let drawn = deck.draw(5, &mut hand);
        assert_eq!(drawn.len(), 2);
        assert_eq!(deck.reshuffle_count(), 0);
        assert!(deck.draw_one().is_none());
    }
}
